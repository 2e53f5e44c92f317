//! Binds the feature files to the step registry.

use crate::fixtures::{GenerationContext, generation_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/generation.feature",
    fixtures = [generation_context: GenerationContext]
);
scenarios!(
    "tests/features/configuration.feature",
    fixtures = [generation_context: GenerationContext]
);
