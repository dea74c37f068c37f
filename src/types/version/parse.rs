/// A package version split into its `[epoch:]version[-release]` parts.
///
/// Nothing is validated here: every string splits into some `Evr`, the
/// ordering code is responsible for making sense of the pieces.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Evr<'a> {
    pub epoch: &'a str,
    pub version: &'a str,
    /// `None` when there is no `-`, or when nothing follows the last one
    pub release: Option<&'a str>,
}

const DEFAULT_EPOCH: &str = "0";

impl<'a> Evr<'a> {
    pub fn parse(evr: &'a str) -> Self {
        // Epoch ends at the first colon
        let (epoch, rest) = match evr.split_once(':') {
            Some(("", rest)) => (DEFAULT_EPOCH, rest),
            Some((epoch, rest)) => (epoch, rest),
            None => (DEFAULT_EPOCH, evr),
        };
        // Release starts after the last dash
        let (version, release) = match rest.rsplit_once('-') {
            Some((version, release)) => (version, Some(release).filter(|r| !r.is_empty())),
            None => (rest, None),
        };

        Evr {
            epoch,
            version,
            release,
        }
    }
}

impl<'a> From<&'a str> for Evr<'a> {
    fn from(s: &'a str) -> Self {
        Evr::parse(s)
    }
}
