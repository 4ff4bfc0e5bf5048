//! Output guard: applied to the generated answer before it leaves the service.

use tracing::warn;

use crate::error::{Rejection, RejectionKind};
use crate::matcher::first_match;
use crate::policy::GuardPolicy;

/// Validates a model response.
///
/// - missing or empty → `empty_response`
/// - contains a disclosure phrase (case-insensitive) → `disclosure_redirect`
/// - otherwise the original text is returned untouched
pub(crate) fn check_response<'a>(
    policy: &GuardPolicy,
    text: Option<&'a str>,
) -> Result<&'a str, Rejection> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => {
            return Err(Rejection::new(
                RejectionKind::EmptyResponse,
                policy.messages.empty_response.clone(),
            ));
        }
    };

    if let Some(phrase) = first_match(text, &policy.disclosure_phrases) {
        warn!(phrase, "response matched disclosure deny-list");
        return Err(Rejection::new(
            RejectionKind::DisclosurePhrase(phrase.to_string()),
            policy.messages.disclosure_redirect.clone(),
        ));
    }

    Ok(text)
}
