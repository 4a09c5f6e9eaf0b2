//! Pass results do not depend on scheduling or input order

use metrology_pipeline::{Compilation, Pipeline, PipelineConfig};
use proptest::prelude::*;

use crate::support::Source;

const NAMES: [&str; 6] = ["Length", "Area", "Position", "Offset", "Drift", "Shift"];

/// One declaration: shape, name, and referenced name.
type Shape = (u8, usize, usize);

fn shapes() -> impl Strategy<Value = Vec<Shape>> {
    proptest::collection::vec((0_u8..5, 0..NAMES.len(), 0..NAMES.len()), 0..12)
}

fn source(shapes: &[Shape]) -> Source {
    let mut source = Source::new("random.cs").unit("UnitOfLength", "Length", &[("Metre", "m")]);
    for &(shape, name, target) in shapes {
        let (name, target) = (NAMES[name], NAMES[target]);
        source = match shape {
            0 => source.scalar(name, "UnitOfLength"),
            1 => source.specialized_scalar(name, target),
            2 => source.group(name, "UnitOfLength"),
            3 => source.specialized_group(name, target),
            _ => source.group(name, "UnitOfLength").companion(target),
        };
    }
    source
}

fn summary(compilation: &Compilation) -> (Vec<String>, Vec<String>) {
    let diagnostics = compilation.diagnostics().iter().map(ToString::to_string).collect();
    let population = compilation.population();
    let published = population
        .scalars()
        .keys()
        .chain(population.groups().keys())
        .map(ToString::to_string)
        .collect();
    (diagnostics, published)
}

proptest! {
    #[test]
    fn parallel_matches_sequential(shapes in shapes()) {
        let declarations = source(&shapes).build();
        let parallel = Pipeline::new(PipelineConfig::default()).run(&declarations).unwrap();
        let sequential = Pipeline::new(PipelineConfig::sequential()).run(&declarations).unwrap();
        prop_assert_eq!(summary(&parallel), summary(&sequential));
    }

    #[test]
    fn input_order_does_not_matter(shapes in shapes()) {
        let declarations = source(&shapes).build();
        let mut reversed = declarations.clone();
        reversed.reverse();

        let pipeline = Pipeline::new(PipelineConfig::sequential());
        let forward = pipeline.run(&declarations).unwrap();
        let backward = pipeline.run(&reversed).unwrap();
        prop_assert_eq!(summary(&forward), summary(&backward));
    }

    #[test]
    fn every_rejected_definition_is_explained(shapes in shapes()) {
        let declarations = source(&shapes).build();
        let compilation = Pipeline::new(PipelineConfig::sequential()).run(&declarations).unwrap();
        let population = compilation.population();

        for declaration in &declarations {
            let identity = declaration.identity();
            if population.kind_of(identity).is_none() {
                prop_assert!(compilation.diagnostics_for(identity).next().is_some());
            }
        }
    }
}
