//! Stack naming
//!
//! Deployment names are normalized to URL-safe slugs; when the caller
//! supplies none, a random adjective+noun name is generated.

use rand::seq::SliceRandom;

const ADJECTIVES: &[&str] = &[
    "amber", "bold", "calm", "dapper", "eager", "fuzzy", "gentle", "humble",
    "jolly", "keen", "lively", "mellow", "nimble", "polished", "quiet",
    "rustic", "sturdy", "tidy", "vivid", "witty",
];

const NOUNS: &[&str] = &[
    "anchor", "beacon", "cedar", "delta", "ember", "fjord", "garnet",
    "harbor", "island", "jetty", "kestrel", "lagoon", "meadow", "nebula",
    "orchard", "prairie", "quarry", "ridge", "summit", "tundra",
];

/// Normalize a name to a lowercase URL-safe slug.
///
/// Runs of characters outside `[a-z0-9]` collapse into a single hyphen;
/// leading and trailing hyphens are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Generate a random `adjective-noun` stack name
pub fn random_name() -> String {
    let mut rng = rand::thread_rng();
    // Slices are non-empty constants.
    let adjective = ADJECTIVES.choose(&mut rng).unwrap();
    let noun = NOUNS.choose(&mut rng).unwrap();
    format!("{}-{}", adjective, noun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_lowercase_and_url_safe() {
        assert_eq!(slugify("My Stack"), "my-stack");
        assert_eq!(slugify("web_app v2!"), "web-app-v2");
        assert_eq!(slugify("--Already--Slugged--"), "already-slugged");
        assert_eq!(slugify("plain"), "plain");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn random_names_are_already_slugs() {
        for _ in 0..20 {
            let name = random_name();
            assert_eq!(slugify(&name), name);
        }
    }
}
