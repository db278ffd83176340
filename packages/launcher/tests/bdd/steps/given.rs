//! Given step definitions
//!
//! Steps that set up the feature corpus.

use cucumber::given;

use crate::world::LauncherWorld;

#[given(expr = "a feature corpus containing {string}")]
fn corpus_containing(world: &mut LauncherWorld, content: String) {
    world.add_feature(&content);
}

#[given(expr = "another feature file containing {string}")]
fn another_feature_file(world: &mut LauncherWorld, content: String) {
    world.add_feature(&content);
}
