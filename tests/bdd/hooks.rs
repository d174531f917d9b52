//! Before and after scenario hooks.
//!
//! The after hook is where soft assertions become a verdict: a scenario with
//! recorded failures panics there, which cucumber reports as a failed hook
//! and a failed scenario.

use cucumber::event::{self, ScenarioFinished};
use cucumber::gherkin::{Feature, Rule, Scenario};
use futures::future::LocalBoxFuture;
use moralis_test_utils::assertions::SoftAssertionFailures;
use moralis_test_utils::ScenarioContext;
use std::time::Instant;

use crate::steps::world::MoralisWorld;

pub fn before_scenario<'a>(
    _feature: &'a Feature,
    _rule: Option<&'a Rule>,
    scenario: &'a Scenario,
    world: &'a mut MoralisWorld,
) -> LocalBoxFuture<'a, ()> {
    Box::pin(async move { start_scenario(world, &scenario.name) })
}

pub fn after_scenario<'a>(
    _feature: &'a Feature,
    _rule: Option<&'a Rule>,
    scenario: &'a Scenario,
    finished: &'a ScenarioFinished,
    world: Option<&'a mut MoralisWorld>,
) -> LocalBoxFuture<'a, ()> {
    Box::pin(async move {
        let Some(world) = world else {
            tracing::error!(scenario = %scenario.name, "🚨 SCENARIO FAILED: {} (no world)", scenario.name);
            return;
        };
        if let Err(failures) = finish_scenario(world, &scenario.name, finished) {
            panic!("{failures}");
        }
    })
}

/// Tag the scenario's logger and start its clock
pub fn start_scenario(world: &mut MoralisWorld, name: &str) {
    world.ctx.set_scenario(name);
    world.started = Some(Instant::now());
    world.ctx.logger.info(format!("=== Starting scenario: {name} ==="));
}

/// Log how the scenario ended and drain its soft assertions
pub fn finish_scenario(
    world: &mut MoralisWorld,
    name: &str,
    finished: &ScenarioFinished,
) -> Result<(), SoftAssertionFailures> {
    log_step_outcome(&world.ctx, finished);

    let duration = world.elapsed_secs();
    let logger = &world.ctx.logger;

    if world.ctx.soft_assert.has_errors() {
        logger.error(format!("🚨 SCENARIO FAILED: {name} (Duration: {duration:.3}s)"));
        logger.error("   Soft assertion errors:");
        for (index, error) in world.ctx.soft_assert.errors().iter().enumerate() {
            logger.error(format!("   {}. {error}", index + 1));
        }
        return world.ctx.soft_assert.throw_if_errors();
    }

    match finished {
        ScenarioFinished::StepFailed(..) | ScenarioFinished::BeforeHookFailed(_) => {
            logger.error(format!("🚨 SCENARIO FAILED: {name} (Duration: {duration:.3}s)"));
        }
        _ => logger.info(format!("✅ SCENARIO PASSED: {name} (Duration: {duration:.3}s)")),
    }
    world.ctx.soft_assert.reset_errors();
    Ok(())
}

fn log_step_outcome(ctx: &ScenarioContext, finished: &ScenarioFinished) {
    let logger = &ctx.logger;
    match finished {
        ScenarioFinished::StepFailed(_, _, error) => {
            let message = match error {
                event::StepError::Panic(info) => panic_message(info),
                other => other.to_string(),
            };
            logger.error("❌ Step Failed");
            logger.error(format!("   ├─ Error: {message}"));
            if let Some(curl) = &ctx.last_request_description {
                logger.error(format!("   ├─ cURL: {curl}"));
            }
        }
        ScenarioFinished::BeforeHookFailed(info) => {
            logger.error(format!("❌ Before hook failed: {}", panic_message(info)));
        }
        ScenarioFinished::StepSkipped => {
            logger.warn("⚠️ Step Skipped: no matching step definition");
        }
        _ => {}
    }
}

/// Text of a panic payload; step errors arrive as formatted strings
fn panic_message(info: &event::Info) -> String {
    if let Some(message) = info.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = info.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "Unknown error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moralis_test_utils::HarnessConfig;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn world() -> MoralisWorld {
        MoralisWorld::with_config(&HarnessConfig::default().with_api_key("key"))
    }

    #[test]
    fn start_tags_logger_and_starts_clock() {
        let mut world = world();
        world.ctx.set_note("chain", "eth").unwrap();

        start_scenario(&mut world, "Fetch history");

        assert_eq!(world.ctx.logger.scenario(), Some("Fetch history"));
        assert!(world.started.is_some());
        assert!(world.ctx.has_note("chain"));
    }

    #[test]
    fn clean_scenario_passes() {
        let mut world = world();
        start_scenario(&mut world, "clean");

        assert!(finish_scenario(&mut world, "clean", &ScenarioFinished::StepPassed).is_ok());
    }

    #[test]
    fn soft_failures_fail_the_scenario_once() {
        let mut world = world();
        world.ctx.soft_assert.fail("first");
        world.ctx.soft_assert.fail("second");

        let failures = finish_scenario(&mut world, "dirty", &ScenarioFinished::StepPassed).unwrap_err();

        assert_eq!(failures.messages().to_vec(), vec!["first", "second"]);
        assert_eq!(failures.to_string(), "Soft assertion failures:\nfirst\nsecond");
        assert!(!world.ctx.soft_assert.has_errors());
    }

    #[test]
    fn hard_failure_without_soft_errors_is_left_to_cucumber() {
        let mut world = world();
        let info: event::Info = Arc::new("boom".to_string());

        let result = finish_scenario(&mut world, "hard", &ScenarioFinished::BeforeHookFailed(info));

        assert!(result.is_ok());
    }

    #[test]
    fn panic_payloads_are_readable() {
        let owned: event::Info = Arc::new("owned".to_string());
        let borrowed: event::Info = Arc::new("borrowed");
        let other: event::Info = Arc::new(7_u8);

        assert_eq!(panic_message(&owned), "owned");
        assert_eq!(panic_message(&borrowed), "borrowed");
        assert_eq!(panic_message(&other), "Unknown error");
    }
}
