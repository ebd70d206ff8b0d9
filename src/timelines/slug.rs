/**
 * Slug Generation
 *
 * Timelines are addressable by a URL-safe slug, unique per user. When the
 * client does not supply one, it is derived from the name: lowercase,
 * runs of non-alphanumeric characters collapsed to a single hyphen,
 * leading/trailing hyphens trimmed.
 */

/// Derive a slug from a timeline name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // swallow leading separators

    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(slugify("Rome"), "rome");
    }

    #[test]
    fn test_spaces_become_hyphens() {
        assert_eq!(slugify("Ancient Rome"), "ancient-rome");
    }

    #[test]
    fn test_nonalphanumeric_runs_collapse() {
        assert_eq!(slugify("Rome -- & Carthage!"), "rome-carthage");
    }

    #[test]
    fn test_leading_trailing_trimmed() {
        assert_eq!(slugify("  Rome  "), "rome");
        assert_eq!(slugify("---Rome---"), "rome");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(slugify("World War 2"), "world-war-2");
    }

    #[test]
    fn test_all_symbols_gives_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
