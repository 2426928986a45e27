//! `verify_and_parse`: the single entry point for an inbound delivery.

use std::sync::Arc;

use eventgate_core::{Clock, EventsApiError, EventsApiEvent, ParseFailure, SystemClock};
use eventgate_security::{signature, FreshnessGate};
use tracing::warn;

use super::envelope::{decode_envelope, Envelope};
use super::inner::decode_inner;
use super::registry::{default_registries, EventRegistries};

/// Verifies and decodes Events API deliveries.
///
/// Holds the clock and the registries; both are read-only, so one parser can
/// serve any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct EventsApiParser<C = SystemClock> {
    clock: C,
    registries: Arc<EventRegistries>,
}

impl EventsApiParser<SystemClock> {
    pub fn new() -> Self {
        Self {
            clock: SystemClock,
            registries: default_registries(),
        }
    }
}

impl Default for EventsApiParser<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EventsApiParser<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> EventsApiParser<D> {
        EventsApiParser {
            clock,
            registries: self.registries,
        }
    }

    pub fn with_registries(mut self, registries: Arc<EventRegistries>) -> Self {
        self.registries = registries;
        self
    }

    pub fn registries(&self) -> &EventRegistries {
        &self.registries
    }

    /// Authenticate a delivery and decode it.
    ///
    /// Checks run in a fixed order and stop at the first failure: timestamp
    /// freshness, then signature, then envelope, then (for `event_callback`)
    /// the inner event. `raw_body` is used as-is for both the signature and
    /// the JSON decoding. The secret is not read when the timestamp is stale.
    pub fn verify_and_parse<S>(
        &self,
        raw_body: &[u8],
        signing_secret: &S,
        timestamp: &str,
        signature: &str,
    ) -> Result<EventsApiEvent, ParseFailure>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        if !FreshnessGate::new(&self.clock).is_fresh(timestamp) {
            warn!(timestamp, "[Slack] Stale request timestamp; rejecting");
            return Err(ParseFailure::bare(EventsApiError::StaleTimestamp));
        }

        if !signature::verify(signing_secret.as_ref(), timestamp, raw_body, signature) {
            warn!("[Slack] Invalid signature; rejecting");
            return Err(ParseFailure::bare(EventsApiError::BadSignature));
        }

        self.decode(raw_body)
    }

    fn decode(&self, raw_body: &[u8]) -> Result<EventsApiEvent, ParseFailure> {
        match decode_envelope(raw_body)? {
            Envelope::Callback(callback) => decode_inner(callback, &self.registries),
            envelope => Ok(envelope.into_event()),
        }
    }
}

/// [`EventsApiParser::verify_and_parse`] with the system clock and the
/// default registries.
pub fn verify_and_parse<S>(
    raw_body: &[u8],
    signing_secret: &S,
    timestamp: &str,
    signature: &str,
) -> Result<EventsApiEvent, ParseFailure>
where
    S: AsRef<[u8]> + ?Sized,
{
    EventsApiParser::new().verify_and_parse(raw_body, signing_secret, timestamp, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::events::{AppMentionEvent, MessageEvent};
    use crate::slack::registry::EventRegistry;
    use eventgate_core::{EventData, FixedClock, UNMARSHALLING_ERROR};
    use eventgate_security::sign;
    use proptest::prelude::*;

    const NOW: i64 = 1_533_878_462;
    const TIMESTAMP: &str = "1533878462";
    const SECRET: &str = "1111111111111111111111111111111";

    const CALLBACK_BODY: &str = r#"
        {
            "token": "XXYYZZ",
            "team_id": "TXXXXXXXX",
            "api_app_id": "AXXXXXXXXX",
            "event": {
                "type": "app_mention",
                "event_ts": "1234567890.123456",
                "user": "UXXXXXXX1"
            },
            "type": "event_callback",
            "authed_users": [ "UXXXXXXX1" ],
            "event_id": "Ev08MFMKH6",
            "event_time": 1234567890
        }
    "#;

    const URL_VERIFICATION_BODY: &str =
        r#"{"token":"fake-token","challenge":"aljdsflaji3jj","type":"url_verification"}"#;

    fn parser() -> EventsApiParser<FixedClock> {
        EventsApiParser::new().with_clock(FixedClock(NOW))
    }

    fn signed(body: &[u8]) -> String {
        sign(SECRET.as_bytes(), TIMESTAMP, body).unwrap()
    }

    /// A secret that must never be read.
    struct PanicSecret;

    impl AsRef<[u8]> for PanicSecret {
        fn as_ref(&self) -> &[u8] {
            panic!("signing secret read for a stale request");
        }
    }

    #[test]
    fn test_callback_with_inner_dispatch() {
        let body = CALLBACK_BODY.as_bytes();
        let event = parser()
            .verify_and_parse(body, SECRET, TIMESTAMP, &signed(body))
            .unwrap();

        assert_eq!(event.event_type, "event_callback");
        assert_eq!(event.token, "XXYYZZ");
        assert_eq!(event.team_id, "TXXXXXXXX");
        let callback = event.data.as_callback().unwrap();
        assert_eq!(callback.event_id, "Ev08MFMKH6");
        assert_eq!(callback.authed_users, vec!["UXXXXXXX1"]);

        let inner = event.inner.as_ref().unwrap();
        assert_eq!(inner.event_type, "app_mention");
        assert!(inner.payload.is::<AppMentionEvent>());
    }

    #[test]
    fn test_url_verification() {
        let body = URL_VERIFICATION_BODY.as_bytes();
        let event = parser()
            .verify_and_parse(body, SECRET, TIMESTAMP, &signed(body))
            .unwrap();
        assert_eq!(event.event_type, "url_verification");
        assert_eq!(event.challenge(), Some("aljdsflaji3jj"));
        assert_eq!(event.data.as_url_verification().unwrap().token, "fake-token");
        assert!(event.inner.is_none());
    }

    #[test]
    fn test_bad_secret() {
        let body = URL_VERIFICATION_BODY.as_bytes();
        let failure = parser()
            .verify_and_parse(body, "hoge", TIMESTAMP, &signed(body))
            .unwrap_err();
        assert!(matches!(failure.error, EventsApiError::BadSignature));
        assert!(failure.event.event_type.is_empty());
        assert!(failure.event.token.is_empty());
        assert!(failure.event.data.is_none());
    }

    #[test]
    fn test_stale_timestamp_skips_hmac() {
        let body = URL_VERIFICATION_BODY.as_bytes();
        let failure = parser()
            .verify_and_parse(body, &PanicSecret, "1533870000", "v0=00")
            .unwrap_err();
        assert!(matches!(failure.error, EventsApiError::StaleTimestamp));
        assert!(failure.event.event_type.is_empty());
    }

    #[test]
    fn test_unknown_inner_type() {
        let body = br#"{"token":"XXYYZZ","team_id":"TXXXXXXXX","type":"event_callback","event":{"type":"definitely_not_real"}}"#;
        let failure = parser()
            .verify_and_parse(&body[..], SECRET, TIMESTAMP, &signed(body))
            .unwrap_err();
        assert!(matches!(
            failure.error,
            EventsApiError::UnknownInnerEvent(ref t) if t == "definitely_not_real"
        ));
        assert_eq!(failure.event.token, "XXYYZZ");
        assert_eq!(failure.event.team_id, "TXXXXXXXX");
    }

    #[test]
    fn test_malformed_json() {
        let failure = parser()
            .verify_and_parse(b"{", SECRET, TIMESTAMP, &signed(b"{"))
            .unwrap_err();
        assert!(matches!(failure.error, EventsApiError::Unmarshalling(_)));
        assert_eq!(failure.event.event_type, UNMARSHALLING_ERROR);
        assert!(matches!(failure.event.data, EventData::UnmarshallingError(_)));
    }

    #[test]
    fn test_unverified_body_is_never_decoded() {
        // Malformed JSON with a wrong signature reports the signature, not the JSON.
        let failure = parser()
            .verify_and_parse(b"{", SECRET, TIMESTAMP, &signed(b"{}"))
            .unwrap_err();
        assert!(matches!(failure.error, EventsApiError::BadSignature));
    }

    #[test]
    fn test_window_boundaries() {
        let body = URL_VERIFICATION_BODY.as_bytes();
        for (ts, fresh) in [(NOW - 300, true), (NOW + 300, true), (NOW - 301, false), (NOW + 301, false)] {
            let ts = ts.to_string();
            let sig = sign(SECRET.as_bytes(), &ts, body).unwrap();
            let result = parser().verify_and_parse(body, SECRET, &ts, &sig);
            assert_eq!(result.is_ok(), fresh, "ts={ts}");
        }
    }

    #[test]
    fn test_malformed_timestamp_fails_signature() {
        let body = URL_VERIFICATION_BODY.as_bytes();
        let failure = parser()
            .verify_and_parse(body, SECRET, "not-a-number", &signed(body))
            .unwrap_err();
        assert!(matches!(failure.error, EventsApiError::BadSignature));
    }

    #[test]
    fn test_uppercase_and_unprefixed_signatures() {
        let body = URL_VERIFICATION_BODY.as_bytes();
        let sig = signed(body);
        let upper = format!("v0={}", sig[3..].to_uppercase());
        for bad in [upper.as_str(), &sig[3..]] {
            let failure = parser()
                .verify_and_parse(body, SECRET, TIMESTAMP, bad)
                .unwrap_err();
            assert!(matches!(failure.error, EventsApiError::BadSignature));
        }
    }

    #[test]
    fn test_body_with_nul_bytes_verified_exactly() {
        let body = b"{\"type\":\"url_verification\",\"challenge\":\"c\"}\0";
        let sig = signed(body);
        // Verified byte-exactly; the trailing NUL then fails JSON decoding.
        let failure = parser()
            .verify_and_parse(body, SECRET, TIMESTAMP, &sig)
            .unwrap_err();
        assert!(matches!(failure.error, EventsApiError::Unmarshalling(_)));

        let inner_nul = b"{\"type\":\"url_verification\",\"challenge\":\"a\\u0000b\"}";
        let event = parser()
            .verify_and_parse(inner_nul, SECRET, TIMESTAMP, &signed(inner_nul))
            .unwrap();
        assert_eq!(event.challenge(), Some("a\0b"));
    }

    #[test]
    fn test_events_api_message_wins() {
        let body = br#"{"type":"event_callback","team_id":"T1","event":{"type":"message","text":"hi","channel_type":"channel"}}"#;
        let event = parser()
            .verify_and_parse(&body[..], SECRET, TIMESTAMP, &signed(body))
            .unwrap();
        let inner = event.inner.unwrap();
        assert_eq!(inner.payload.downcast_ref::<MessageEvent>().unwrap().channel_type, "channel");
    }

    #[test]
    fn test_custom_registries() {
        let registries = Arc::new(EventRegistries::new(
            EventRegistry::new("mentions_only").with::<AppMentionEvent>("app_mention"),
            None,
        ));
        let parser = parser().with_registries(registries);
        let body = br#"{"type":"event_callback","event":{"type":"message"}}"#;
        let failure = parser
            .verify_and_parse(&body[..], SECRET, TIMESTAMP, &signed(body))
            .unwrap_err();
        assert_eq!(failure.kind(), "unknown_inner_event");
    }

    #[test]
    fn test_default_entry_point_rejects_stale_requests() {
        // 2018 is outside any replay window of the system clock.
        let body = URL_VERIFICATION_BODY.as_bytes();
        let failure = verify_and_parse(body, SECRET, TIMESTAMP, &signed(body)).unwrap_err();
        assert!(matches!(failure.error, EventsApiError::StaleTimestamp));
    }

    proptest! {
        #[test]
        fn prop_valid_signature_passes_authentication(
            secret in proptest::collection::vec(proptest::num::u8::ANY, 1..64),
            skew in -300i64..=300,
            body in proptest::collection::vec(proptest::num::u8::ANY, 0..256)
        ) {
            let ts = (NOW + skew).to_string();
            let sig = sign(&secret, &ts, &body).unwrap();
            let result = parser().verify_and_parse(&body, &secret, &ts, &sig);
            if let Err(failure) = result {
                prop_assert!(!failure.error.is_authentication_failure());
            }
        }

        #[test]
        fn prop_forged_signature_is_rejected(
            body in proptest::collection::vec(proptest::num::u8::ANY, 0..256),
            forged in "v0=[0-9a-f]{64}"
        ) {
            prop_assume!(forged != signed(&body));
            let failure = parser()
                .verify_and_parse(&body, SECRET, TIMESTAMP, &forged)
                .unwrap_err();
            prop_assert!(matches!(failure.error, EventsApiError::BadSignature));
        }
    }
}
