//! Pure identity helpers: username derivation and quick-login matching.

/// Derives the base username for a new account from the email's local part.
/// Collisions are resolved by the caller via [`suffixed_username`].
pub fn username_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// The candidate username for a given collision attempt: the base name
/// unchanged on attempt 0, then `base1`, `base2`, ...
pub fn suffixed_username(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}{}", base, attempt)
    }
}

/// The first whitespace-separated token of a display name, used for
/// quick-login first-name matching.
pub fn first_name_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

/// Resolution of a quick-login lookup over candidate matches.
///
/// The original behavior of picking the first of several matching citizens
/// silently authenticated into an arbitrary account; an ambiguous match is
/// therefore rejected instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickLoginResolution<T> {
    /// Exactly one citizen matched.
    Unique(T),
    /// Nobody matched; suggest registration.
    NoMatch,
    /// More than one citizen matched; refuse to guess.
    Ambiguous(usize),
}

/// Resolves a quick-login lookup from the set of citizens whose phone
/// matched exactly, applying the name-token containment rule.
pub fn resolve_quick_login<T>(
    phone_matches: Vec<T>,
    supplied_name: &str,
    first_name_of: impl Fn(&T) -> &str,
) -> QuickLoginResolution<T> {
    let token = first_name_token(supplied_name).to_lowercase();

    let mut matched: Vec<T> = phone_matches
        .into_iter()
        .filter(|c| first_name_of(c).to_lowercase().contains(&token))
        .collect();

    match matched.len() {
        0 => QuickLoginResolution::NoMatch,
        1 => QuickLoginResolution::Unique(matched.remove(0)),
        n => QuickLoginResolution::Ambiguous(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_from_email() {
        assert_eq!(username_from_email("ahmed.ali@example.com"), "ahmed.ali");
        assert_eq!(username_from_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_suffixed_username() {
        assert_eq!(suffixed_username("ahmed", 0), "ahmed");
        assert_eq!(suffixed_username("ahmed", 1), "ahmed1");
        assert_eq!(suffixed_username("ahmed", 12), "ahmed12");
    }

    #[test]
    fn test_first_name_token() {
        assert_eq!(first_name_token("أحمد علي حسن"), "أحمد");
        assert_eq!(first_name_token("Mona"), "Mona");
        assert_eq!(first_name_token(""), "");
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct C(&'static str);

    #[test]
    fn test_quick_login_unique_match() {
        let matches = vec![C("Ahmed"), C("Mona")];
        let resolved = resolve_quick_login(matches, "ahmed ali", |c| c.0);
        assert_eq!(resolved, QuickLoginResolution::Unique(C("Ahmed")));
    }

    #[test]
    fn test_quick_login_no_match() {
        let matches = vec![C("Ahmed")];
        let resolved = resolve_quick_login(matches, "Karim", |c| c.0);
        assert_eq!(resolved, QuickLoginResolution::NoMatch);
    }

    #[test]
    fn test_quick_login_ambiguous_is_rejected() {
        let matches = vec![C("Ahmed Hassan"), C("Ahmed Samir")];
        let resolved = resolve_quick_login(matches, "Ahmed", |c| c.0);
        assert_eq!(resolved, QuickLoginResolution::Ambiguous(2));
    }

    #[test]
    fn test_quick_login_token_containment() {
        // "محمد" is contained in "محمدي"; containment, not equality
        let matches = vec![C("محمدي")];
        let resolved = resolve_quick_login(matches, "محمد كمال", |c| c.0);
        assert_eq!(resolved, QuickLoginResolution::Unique(C("محمدي")));
    }
}
