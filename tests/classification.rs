mod common;

use alloy_primitives::{Address, Bytes};
use alloy_provider::{mock::Asserter, ProviderBuilder};

use erc721_indexer::indexer::classification::ComplianceClassifier;
use erc721_indexer::models::datasets::transfers::ComplianceVerdict;

use common::{address_word, bool_word};

const CONTRACT: Address = Address::repeat_byte(0xc0);
const IMPLEMENTATION: Address = Address::repeat_byte(0x1e);

fn mocked() -> (Asserter, impl alloy_provider::Provider) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
    (asserter, provider)
}

#[tokio::test]
async fn test_direct_compliance_is_cached() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    asserter.push_success(&bool_word(true));
    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::DirectlyCompliant
    );

    // The response queue is exhausted, so a second probe sequence would
    // come back as call failures and a different verdict.
    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::DirectlyCompliant
    );
}

#[tokio::test]
async fn test_proxy_compliance() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    // Direct probe reverts, the proxy accessor answers, the implementation
    // confirms support.
    asserter.push_failure_msg("execution reverted");
    asserter.push_success(&address_word(IMPLEMENTATION));
    asserter.push_success(&bool_word(true));

    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::CompliantViaProxy(IMPLEMENTATION)
    );
}

#[tokio::test]
async fn test_proxy_overrides_direct_false() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    // A non-forwarding admin surface can answer false on the proxy itself
    // while the implementation behind it supports the interface.
    asserter.push_success(&bool_word(false));
    asserter.push_success(&address_word(IMPLEMENTATION));
    asserter.push_success(&bool_word(true));

    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::CompliantViaProxy(IMPLEMENTATION)
    );
}

#[tokio::test]
async fn test_definitive_false_without_proxy() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    asserter.push_success(&bool_word(false));
    asserter.push_failure_msg("execution reverted");

    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::NotCompliant
    );
}

#[tokio::test]
async fn test_false_on_both_paths() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    asserter.push_success(&bool_word(false));
    asserter.push_success(&address_word(IMPLEMENTATION));
    asserter.push_success(&bool_word(false));

    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::NotCompliant
    );
}

#[tokio::test]
async fn test_all_failures_are_indeterminate() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    asserter.push_failure_msg("execution reverted");
    asserter.push_failure_msg("execution reverted");

    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::Indeterminate
    );
}

#[tokio::test]
async fn test_undecodable_probe_return_is_a_failure() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    // Garbage that does not decode as a boolean word is a call failure,
    // not a definitive answer.
    asserter.push_success(&Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
    asserter.push_failure_msg("execution reverted");

    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::Indeterminate
    );
}

#[tokio::test]
async fn test_concurrent_classification_coalesces() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);

    // Exactly one probe sequence is queued. If the concurrent calls did
    // not coalesce, the second would drain an empty queue and produce an
    // indeterminate verdict.
    asserter.push_success(&bool_word(true));

    let (first, second) = tokio::join!(
        classifier.classify(CONTRACT, None),
        classifier.classify(CONTRACT, None)
    );
    assert_eq!(first, ComplianceVerdict::DirectlyCompliant);
    assert_eq!(second, ComplianceVerdict::DirectlyCompliant);
}

#[tokio::test]
async fn test_verdicts_are_per_address() {
    let (asserter, provider) = mocked();
    let classifier = ComplianceClassifier::new(&provider);
    let other = Address::repeat_byte(0xd1);

    asserter.push_success(&bool_word(true));
    asserter.push_success(&bool_word(false));
    asserter.push_failure_msg("execution reverted");

    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::DirectlyCompliant
    );
    assert_eq!(
        classifier.classify(other, None).await,
        ComplianceVerdict::NotCompliant
    );

    // Both verdicts come from the cache now
    assert_eq!(
        classifier.classify(CONTRACT, None).await,
        ComplianceVerdict::DirectlyCompliant
    );
    assert_eq!(
        classifier.classify(other, None).await,
        ComplianceVerdict::NotCompliant
    );
}
