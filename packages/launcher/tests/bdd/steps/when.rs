//! When step definitions
//!
//! Steps that run validation, argument parsing and remote resolution.

use cucumber::when;

use bdd_launcher::cli::{parse_remote_arguments, split_tag_list};
use bdd_launcher::remote::RemoteServiceResolver;
use bdd_launcher::tags::check_requested_tags;

use crate::world::LauncherWorld;

fn validate(world: &mut LauncherWorld) {
    let corpus = world.corpus.as_ref().expect("corpus not set up");
    world.validation = Some(check_requested_tags(&world.requested, corpus.path()));
}

#[when(expr = "the tags {string} are requested")]
fn tags_requested(world: &mut LauncherWorld, tags: String) {
    world.requested = split_tag_list(&tags);
    validate(world);
}

#[when(expr = "the combined remote argument {string} is given")]
fn combined_argument(world: &mut LauncherWorld, argument: String) {
    let parsed = parse_remote_arguments(&argument);
    if let Ok(arguments) = &parsed {
        world.requested = arguments
            .tags
            .as_deref()
            .map(split_tag_list)
            .unwrap_or_default();
        if world.corpus.is_some() {
            validate(world);
        }
    }
    world.remote_arguments = Some(parsed);
}

#[when(expr = "the remote service {string} is resolved")]
fn remote_resolved(world: &mut LauncherWorld, service: String) {
    world.remote = Some(RemoteServiceResolver::default().resolve(&service));
}
