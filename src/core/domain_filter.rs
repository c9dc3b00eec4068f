use std::fmt;

use regex::Regex;

/// Decides whether a hosted zone is in scope for this provider instance.
///
/// Two construction modes: a suffix list (`new`) or a pair of regular
/// expressions (`new_regex`). In both modes exclusion overrides inclusion,
/// and an empty filter matches everything.
#[derive(Debug, Clone)]
pub enum DomainFilter {
    List {
        include: Vec<String>,
        exclude: Vec<String>,
    },
    Regex {
        include: Regex,
        exclude: Option<Regex>,
    },
}

impl Default for DomainFilter {
    fn default() -> Self {
        DomainFilter::new(Vec::new(), Vec::new())
    }
}

impl DomainFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        DomainFilter::List {
            include: normalize(include),
            exclude: normalize(exclude),
        }
    }

    pub fn new_regex(include: Regex, exclude: Option<Regex>) -> Self {
        DomainFilter::Regex { include, exclude }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            DomainFilter::List { include, exclude } => {
                let name = name.trim_end_matches('.').to_lowercase();
                let included =
                    include.is_empty() || include.iter().any(|domain| suffix_match(&name, domain));
                included && !exclude.iter().any(|domain| suffix_match(&name, domain))
            }
            DomainFilter::Regex { include, exclude } => {
                include.is_match(name)
                    && !exclude.as_ref().map_or(false, |regex| regex.is_match(name))
            }
        }
    }
}

// A domain owns a name only on a label boundary, so "bar.com" never
// captures "foobar.com".
fn suffix_match(name: &str, domain: &str) -> bool {
    name == domain || name.ends_with(&format!(".{domain}"))
}

fn normalize(domains: Vec<String>) -> Vec<String> {
    domains
        .into_iter()
        .map(|domain| {
            domain
                .trim()
                .trim_start_matches('.')
                .trim_end_matches('.')
                .to_lowercase()
        })
        .filter(|domain| !domain.is_empty())
        .collect()
}

impl fmt::Display for DomainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainFilter::List { include, exclude } => {
                if include.is_empty() && exclude.is_empty() {
                    return write!(f, "no domain filter");
                }
                write!(f, "domain filter [{}]", include.join(", "))?;
                if !exclude.is_empty() {
                    write!(f, " excluding [{}]", exclude.join(", "))?;
                }
                Ok(())
            }
            DomainFilter::Regex { include, exclude } => {
                write!(f, "regex domain filter '{include}'")?;
                if let Some(exclude) = exclude {
                    write!(f, " with exclusion '{exclude}'")?;
                }
                Ok(())
            }
        }
    }
}
