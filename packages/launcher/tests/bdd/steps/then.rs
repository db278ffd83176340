//! Then step definitions
//!
//! Steps that verify the results.

use std::path::PathBuf;

use cucumber::then;

use bdd_launcher::cli::split_tag_list;
use bdd_launcher::engine::RunOutcome;
use bdd_launcher::tags::tag_arguments;
use bdd_launcher::LauncherError;

use crate::world::LauncherWorld;

#[then("validation succeeds")]
fn validation_succeeds(world: &mut LauncherWorld) {
    match &world.validation {
        Some(Ok(())) => {}
        other => panic!("expected successful validation, got {other:?}"),
    }
}

#[then(expr = "the engine receives the tags {string}")]
fn engine_receives(world: &mut LauncherWorld, tags: String) {
    let expected: Vec<String> = split_tag_list(&tags)
        .into_iter()
        .flat_map(|tag| ["--tags".to_string(), tag])
        .collect();
    assert_eq!(tag_arguments(&world.requested), expected);
}

#[then(expr = "validation fails because {string} is not a tag")]
fn fails_format(world: &mut LauncherWorld, tag: String) {
    match &world.validation {
        Some(Err(LauncherError::InvalidTagFormat(found))) => assert_eq!(found, &tag),
        other => panic!("expected InvalidTagFormat, got {other:?}"),
    }
}

#[then(expr = "validation fails because {string} does not exist")]
fn fails_unknown(world: &mut LauncherWorld, tag: String) {
    match &world.validation {
        Some(Err(LauncherError::UnknownTag(found))) => assert_eq!(found, &tag),
        other => panic!("expected UnknownTag, got {other:?}"),
    }
}

#[then(expr = "the remote config is {string}")]
fn remote_config_is(world: &mut LauncherWorld, config: String) {
    match &world.remote_arguments {
        Some(Ok(arguments)) => assert_eq!(arguments.config, config),
        other => panic!("expected parsed remote arguments, got {other:?}"),
    }
}

#[then("the combined remote argument is rejected")]
fn combined_rejected(world: &mut LauncherWorld) {
    assert!(matches!(
        world.remote_arguments,
        Some(Err(LauncherError::InvalidRemoteArguments(_)))
    ));
}

#[then(expr = "the remote type is {string}")]
fn remote_type_is(world: &mut LauncherWorld, expected: String) {
    let remote = world.remote.as_ref().expect("remote not resolved");
    assert_eq!(remote.kind().as_str(), expected);
}

#[then("the post-run hook can be invoked")]
fn hook_invocable(world: &mut LauncherWorld) {
    let remote = world.remote.as_ref().expect("remote not resolved");
    remote.after(&RunOutcome {
        succeeded: true,
        session_id: None,
        report: PathBuf::from("report.json"),
    });
}
