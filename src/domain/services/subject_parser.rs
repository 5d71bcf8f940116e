use regex::Regex;
use std::sync::OnceLock;

/// Parse subject names out of free-form user input.
///
/// Any run of commas, semicolons or whitespace separates two names.
pub fn parse_subjects(from: &str) -> Vec<String> {
    static DELIMITER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = DELIMITER_REGEX
        .get_or_init(|| Regex::new(r"[,;\s]+").expect("Invalid subject delimiter regex"));

    let trimmed = from.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    re.split(trimmed)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a user subject into its user name and e-mail domain.
pub fn get_user_name_parts(user: &str) -> (String, Option<String>) {
    let mut parts = user.split('@');
    let name = parts.next().unwrap_or_default().to_string();
    let domain = parts.next().map(str::to_string);

    (name, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subjects_empty_input() {
        assert!(parse_subjects("").is_empty());
        assert!(parse_subjects("   ").is_empty());
        assert!(parse_subjects("\t\n").is_empty());
    }

    #[test]
    fn test_parse_subjects_mixed_delimiters() {
        assert_eq!(parse_subjects("a,b; c   d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_subjects_single() {
        assert_eq!(parse_subjects("subject1"), vec!["subject1"]);
        assert_eq!(parse_subjects("  subject1\t"), vec!["subject1"]);
    }

    #[test]
    fn test_parse_subjects_spaced_delimiters() {
        let cases = [
            "subject1,subject2",
            "subject1, subject2",
            "subject1 ,subject2",
            "subject1 , subject2",
            "subject1;subject2",
            "subject1 ; subject2",
            "subject1\tsubject2",
        ];

        for case in cases {
            assert_eq!(
                parse_subjects(case),
                vec!["subject1", "subject2"],
                "input: {:?}",
                case
            );
        }
    }

    #[test]
    fn test_parse_subjects_trailing_delimiters() {
        assert_eq!(
            parse_subjects("some-account, test1, test, test2, default,;,; "),
            vec!["some-account", "test1", "test", "test2", "default"]
        );
        assert_eq!(parse_subjects(",a"), vec!["a"]);
    }

    #[test]
    fn test_parse_subjects_keeps_duplicates_and_case() {
        assert_eq!(parse_subjects("Alice alice Alice"), vec!["Alice", "alice", "Alice"]);
    }

    #[test]
    fn test_get_user_name_parts() {
        assert_eq!(get_user_name_parts(""), (String::new(), None));
        assert_eq!(get_user_name_parts("test"), ("test".to_string(), None));
        assert_eq!(
            get_user_name_parts("test@test.com"),
            ("test".to_string(), Some("test.com".to_string()))
        );
        assert_eq!(
            get_user_name_parts("test@other-test@some-other-test"),
            ("test".to_string(), Some("other-test".to_string()))
        );
    }
}
