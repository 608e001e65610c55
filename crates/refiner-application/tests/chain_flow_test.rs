mod support;

use refiner_core::RefinerError;
use refiner_core::operation::OperationKind;
use support::harness;

#[tokio::test]
async fn step1_output_is_substituted_into_step2() {
    let h = harness().await;
    h.gateway.queue_chain_output(Ok("cats are great".to_string()));
    h.gateway.queue_chain_output(Ok("Cats: great.".to_string()));

    let outcome = h
        .session
        .run_chain("Write something about cats", "Summary: {{step1Output}}")
        .await
        .unwrap();

    assert_eq!(
        *h.gateway.chain_inputs.lock().unwrap(),
        vec![
            "Write something about cats".to_string(),
            "Summary: cats are great".to_string()
        ]
    );
    assert_eq!(outcome.value.step1_output, "cats are great");
    assert_eq!(outcome.value.step2_prompt, "Summary: cats are great");
    assert_eq!(outcome.value.final_output, "Cats: great.");
    assert_eq!(
        h.session.state().await.chain().value(),
        Some(&outcome.value)
    );
}

#[tokio::test]
async fn every_placeholder_occurrence_is_replaced_literally() {
    let h = harness().await;
    h.gateway.queue_chain_output(Ok("{x} & $1".to_string()));

    let outcome = h
        .session
        .run_chain("step one", "A={{step1Output}} B={{step1Output}}")
        .await
        .unwrap();

    assert_eq!(outcome.value.step2_prompt, "A={x} & $1 B={x} & $1");
}

#[tokio::test]
async fn template_without_placeholder_is_sent_unchanged() {
    let h = harness().await;

    let outcome = h
        .session
        .run_chain("step one", "Write a haiku about rain")
        .await
        .unwrap();

    assert_eq!(outcome.value.step2_prompt, "Write a haiku about rain");
    assert_eq!(outcome.value.final_output, "echo: Write a haiku about rain");
}

#[tokio::test]
async fn step2_failure_keeps_step1_output() {
    let h = harness().await;
    h.gateway.queue_chain_output(Ok("draft text".to_string()));
    h.gateway
        .queue_chain_output(Err(RefinerError::generation("model overloaded")));

    let err = h
        .session
        .run_chain("Draft it", "Polish: {{step1Output}}")
        .await
        .unwrap_err();

    assert!(err.is_generation());
    let state = h.session.state().await;
    assert_eq!(state.chain_step1_output(), Some("draft text"));
    assert_eq!(state.chain().state().error(), Some(&err));
    assert_eq!(h.gateway.calls_of(OperationKind::RunChainStep), 2);
}

#[tokio::test]
async fn step1_failure_skips_step2() {
    let h = harness().await;
    h.gateway
        .queue_chain_output(Err(RefinerError::generation("quota exceeded")));

    let err = h
        .session
        .run_chain("Draft it", "Polish: {{step1Output}}")
        .await
        .unwrap_err();

    assert!(err.is_generation());
    assert_eq!(h.gateway.calls_of(OperationKind::RunChainStep), 1);
    assert_eq!(h.session.state().await.chain_step1_output(), None);
}

#[tokio::test]
async fn blank_inputs_are_rejected_without_calls() {
    let h = harness().await;

    assert!(h.session.run_chain("  ", "Polish").await.unwrap_err().is_validation());
    assert!(h.session.run_chain("Draft", "\n").await.unwrap_err().is_validation());
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test]
async fn chain_does_not_require_an_analysis_or_touch_history() {
    let h = harness().await;

    h.session.run_chain("Draft", "Polish: {{step1Output}}").await.unwrap();

    assert!(h.session.history().is_empty().await);
    assert!(h.session.state().await.analysis().state().is_idle());
}
