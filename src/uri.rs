//! Route path composition.

use std::fmt;

/// A normalized route path: `/`-separated, no empty segments, no trailing separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    segments: Vec<String>,
}

impl Uri {
    pub fn parse(text: &str) -> Self {
        let mut uri = Self::default();
        uri.add(text);
        uri
    }

    /// Append a path fragment; surrounding and repeated separators are dropped
    pub fn add(&mut self, fragment: &str) -> &mut Self {
        self.segments.extend(
            fragment
                .split('/')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Join every parent with every fragment.
///
/// An empty list on either side acts as a single empty path. The result keeps
/// parent-major order and drops duplicates.
pub fn compose<P, F>(parents: &[P], fragments: &[F]) -> Vec<String>
where
    P: AsRef<str>,
    F: AsRef<str>,
{
    let parents: Vec<&str> = if parents.is_empty() {
        vec![""]
    } else {
        parents.iter().map(AsRef::as_ref).collect()
    };
    let fragments: Vec<&str> = if fragments.is_empty() {
        vec![""]
    } else {
        fragments.iter().map(AsRef::as_ref).collect()
    };

    let mut uris: Vec<String> = Vec::new();
    for parent in &parents {
        for fragment in &fragments {
            let uri = Uri::parse(parent).add(fragment).to_string();
            if !uris.contains(&uri) {
                uris.push(uri);
            }
        }
    }
    uris
}
