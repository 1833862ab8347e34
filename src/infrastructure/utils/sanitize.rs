/// Escapes angle brackets and trims whitespace so visitor input cannot
/// inject markup into the email body.
pub fn sanitize(input: &str) -> String {
    input
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn escapes_angle_brackets() {
        assert_eq!(
            sanitize("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize("  hello there \n"), "hello there");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(sanitize("Just a normal subject"), "Just a normal subject");
    }
}
