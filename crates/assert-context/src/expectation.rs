//! What an error check expects.
//!
//! [`Expectation`] is the explicit form of "no error", "some error", "this
//! error" and "an error mentioning this text". `From` impls keep call sites
//! short: `()` means no error, a `bool` says whether an error is expected,
//! and a string asks for an error containing it (the empty string means no
//! error).

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Expected outcome of a fallible call.
#[derive(Clone)]
pub enum Expectation {
    /// The call must succeed.
    NoError,
    /// `true`: the call must fail. `false`: it must succeed.
    Presence(bool),
    /// The call must fail with this error, either the same object somewhere
    /// in the actual error's source chain or an error with the same message.
    Exact(Arc<dyn Error + Send + Sync + 'static>),
    /// The call must fail with a message containing this text. An empty
    /// string behaves like [`Expectation::NoError`].
    Contains(String),
}

impl Expectation {
    /// Expect exactly `error`.
    pub fn exact<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Expectation::Exact(Arc::new(error))
    }

    /// Expect an error whose message contains `text`.
    pub fn containing(text: impl Into<String>) -> Self {
        Expectation::Contains(text.into())
    }

    /// Whether this expectation is satisfied only by a successful call.
    pub fn expects_success(&self) -> bool {
        match self {
            Expectation::NoError => true,
            Expectation::Presence(present) => !present,
            Expectation::Exact(_) => false,
            Expectation::Contains(text) => text.is_empty(),
        }
    }

    /// Check `actual` against this expectation.
    ///
    /// Returns `Ok(())` on a match, or the failure message otherwise.
    pub fn evaluate(&self, actual: Option<&(dyn Error + 'static)>) -> Result<(), String> {
        if self.expects_success() {
            return match actual {
                None => Ok(()),
                Some(err) => Err(format!("unexpected error {err:?}")),
            };
        }
        match self {
            Expectation::Exact(want) => match actual {
                None => Err(format!("expected error {want} but call succeeded")),
                Some(err) if chain_matches(err, want.as_ref()) => Ok(()),
                Some(err) => Err(format!("expected error {want} but got {err:?}")),
            },
            Expectation::Contains(text) => match actual {
                None => Err(format!(
                    "expected an error containing {text}, but call succeeded"
                )),
                Some(err) if err.to_string().contains(text.as_str()) => Ok(()),
                Some(err) => Err(format!(
                    "expected an error containing {text}, but got {err:?}"
                )),
            },
            Expectation::NoError | Expectation::Presence(_) => match actual {
                None => Err("expected an error, but call succeeded".to_string()),
                Some(_) => Ok(()),
            },
        }
    }
}

/// Whether some link of `actual`'s source chain is `want` itself or renders
/// the same message.
fn chain_matches(actual: &(dyn Error + 'static), want: &(dyn Error + Send + Sync + 'static)) -> bool {
    let want_msg = want.to_string();
    let mut link = Some(actual);
    while let Some(err) = link {
        if std::ptr::addr_eq(err, want) || err.to_string() == want_msg {
            return true;
        }
        link = err.source();
    }
    false
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::NoError => write!(f, "NoError"),
            Expectation::Presence(present) => f.debug_tuple("Presence").field(present).finish(),
            Expectation::Exact(err) => f.debug_tuple("Exact").field(&err.to_string()).finish(),
            Expectation::Contains(text) => f.debug_tuple("Contains").field(text).finish(),
        }
    }
}

impl From<()> for Expectation {
    fn from(_: ()) -> Self {
        Expectation::NoError
    }
}

impl From<bool> for Expectation {
    fn from(present: bool) -> Self {
        Expectation::Presence(present)
    }
}

impl From<&str> for Expectation {
    fn from(text: &str) -> Self {
        Expectation::Contains(text.to_string())
    }
}

impl From<String> for Expectation {
    fn from(text: String) -> Self {
        Expectation::Contains(text)
    }
}

impl From<Option<&str>> for Expectation {
    fn from(text: Option<&str>) -> Self {
        text.map_or(Expectation::NoError, Expectation::from)
    }
}

impl From<Arc<dyn Error + Send + Sync + 'static>> for Expectation {
    fn from(error: Arc<dyn Error + Send + Sync + 'static>) -> Self {
        Expectation::Exact(error)
    }
}
