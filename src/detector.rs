use crate::declaration::SourceUnit;
use crate::error::{Error, Result};
use crate::strategy::Framework;
use clap::ValueEnum;
use log::debug;

/// Picks the extraction strategy when the configuration names none.
///
/// Every known framework's strategy is asked which classes it would accept as
/// controllers; the framework accepting the most wins. Ties go to the
/// framework listed first in [`Framework`].
pub struct FrameworkDetector;

/// Per-framework controller counts from a detection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    /// Frameworks with at least one controller, most controllers first
    pub frameworks: Vec<(Framework, usize)>,
}

impl DetectionResult {
    pub fn best(&self) -> Option<Framework> {
        self.frameworks.first().map(|(framework, _)| *framework)
    }
}

impl FrameworkDetector {
    /// Counts accepted controller classes per framework.
    ///
    /// # Arguments
    ///
    /// * `units` - Lowered declarations of every parsed file
    pub fn detect(units: &[SourceUnit]) -> DetectionResult {
        let mut frameworks: Vec<(Framework, usize)> = Framework::value_variants()
            .iter()
            .map(|framework| {
                let strategy = framework.strategy();
                let count = units
                    .iter()
                    .flat_map(|unit| unit.classes.iter())
                    .filter(|class| strategy.accept_class(class))
                    .count();
                (*framework, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();
        // stable sort keeps declaration order on ties
        frameworks.sort_by(|a, b| b.1.cmp(&a.1));

        debug!("Detected frameworks: {:?}", frameworks);
        DetectionResult { frameworks }
    }

    /// The framework to use for `units`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameworkNotDetected`] if no class looks like a
    /// controller of any known framework.
    pub fn require(units: &[SourceUnit]) -> Result<Framework> {
        Self::detect(units).best().ok_or(Error::FrameworkNotDetected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::lower_file;
    use crate::parser::ParsedFile;

    fn units(code: &str) -> Vec<SourceUnit> {
        let parsed = ParsedFile::from_source("controller.rs", code).unwrap();
        vec![lower_file(&parsed)]
    }

    #[test]
    fn test_detect_spring_controllers() {
        let units = units(
            r#"
            #[rest_controller]
            impl UserController {
                #[get_mapping("/users")]
                fn list(&self) -> Vec<User> { todo!() }
            }

            #[controller]
            impl PageController {}

            impl Helper {}
            "#,
        );
        let result = FrameworkDetector::detect(&units);
        assert_eq!(result.frameworks, vec![(Framework::Spring, 2)]);
        assert_eq!(FrameworkDetector::require(&units).unwrap(), Framework::Spring);
    }

    #[test]
    fn test_no_controllers() {
        let units =
            units("pub struct User { pub id: u64 } impl User { fn id(&self) -> u64 { self.id } }");
        assert!(FrameworkDetector::detect(&units).best().is_none());
        assert!(matches!(
            FrameworkDetector::require(&units),
            Err(Error::FrameworkNotDetected)
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(FrameworkDetector::detect(&[]).frameworks.is_empty());
    }
}
