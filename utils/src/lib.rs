//! Small helpers shared by the front end and the type checker.

pub mod ref_eq;

pub use self::ref_eq::RefEq;

#[macro_export]
macro_rules! assert_matches {
    ($expression: expr, $( $pattern: pat )|*) => {{
        match $expression {
            $( $pattern )|* => (),
            ref expression => panic!(
                r#"assertion failed: `(if let pattern = expression), {}:{}:{}`
pattern: `{}`,
expression: `{:?}`"#,
                file!(),
                line!(),
                column!(),
                stringify!($( $pattern )|*),
                expression
            ),
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn assert_matches_borrows_place_expressions() {
        let tokens = vec![Some(String::from("class")), None];
        assert_matches!(tokens[0], Some(_));
        assert_matches!(tokens[1], None);
        // still usable, nothing was moved out
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    #[should_panic]
    fn assert_matches_panics_on_mismatch() {
        assert_matches!(Some(3), None);
    }
}
