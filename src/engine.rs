//! Drives an extraction strategy over declaration units into a [`Project`].

use crate::config::DocConfig;
use crate::declaration::{ClassDecl, MethodDecl, SourceUnit, TagKind};
use crate::resolver::TypeResolvers;
use crate::schema::{Chapter, Project, Section};
use crate::strategy::{ExtractContext, Framework, ParserStrategy};
use crate::type_resolver::TypeDescriptor;
use log::{debug, info, warn};
use std::sync::Arc;

const IGNORE_TAG: &str = "ignore";
const BOOK_TAG: &str = "book";

/// A configured strategy plus its resolver registry.
///
/// Construction is the registry's setup phase: the strategy registers its
/// plugin resolvers, then the registry is frozen behind an `Arc` and may be
/// shared by engines running on other threads.
pub struct DocEngine {
    strategy: Box<dyn ParserStrategy>,
    resolvers: Arc<TypeResolvers>,
}

impl DocEngine {
    pub fn new(strategy: Box<dyn ParserStrategy>) -> Self {
        let mut builder = TypeResolvers::builder();
        strategy.on_load(&mut builder);
        let resolvers = Arc::new(builder.build());
        info!("Loaded {} extraction strategy", strategy.name());
        Self {
            strategy,
            resolvers,
        }
    }

    pub fn for_framework(framework: Framework) -> Self {
        Self::new(framework.strategy())
    }

    pub fn strategy(&self) -> &dyn ParserStrategy {
        self.strategy.as_ref()
    }

    pub fn resolvers(&self) -> &Arc<TypeResolvers> {
        &self.resolvers
    }

    /// Build an unfiltered project from the given units, in unit order
    pub fn build_project(
        &self,
        config: &DocConfig,
        units: &[SourceUnit],
        descriptor: &dyn TypeDescriptor,
    ) -> Project {
        let mut project = Project::new(config.id.clone(), config.display_name());
        project.description = config.description.clone();
        project.version = config.version.clone();

        let cx = ExtractContext::new(&self.resolvers, descriptor)
            .with_url_prefix(&config.url_prefix);

        for unit in units {
            for class in unit.classes.iter().filter(|c| self.strategy.accept_class(c)) {
                debug!("Visiting {} in {}", class.name, unit.path.display());
                project.add_chapter(self.build_chapter(class, &cx));
            }
        }

        info!(
            "Extracted {} chapters with {} sections",
            project.chapters().count(),
            project.sections().count()
        );
        project
    }

    fn build_chapter(&self, class: &ClassDecl, cx: &ExtractContext<'_>) -> Chapter {
        let mut chapter = Chapter::new(class.doc.summary().unwrap_or(&class.name));
        chapter.description = class.doc.description.clone();
        chapter.ignore = class.doc.has_tag(IGNORE_TAG);
        chapter.book = class
            .doc
            .tag(TagKind::Named, BOOK_TAG)
            .map(|tag| tag.content.trim().to_string())
            .filter(|book| !book.is_empty());

        self.strategy.visit_class(class, &mut chapter, cx);

        for method in class
            .methods
            .iter()
            .filter(|m| self.strategy.accept_method(class, m))
        {
            match self
                .strategy
                .visit_method(method, &chapter, section_for(method), cx)
            {
                Ok(sections) => chapter.sections.extend(sections),
                Err(e) => warn!("{} ({})", e, class.name),
            }
        }
        chapter
    }
}

/// A section carrying the handler's documentation, ready for the strategy
fn section_for(method: &MethodDecl) -> Section {
    let mut section = Section::new(method.name.clone());
    if let Some(summary) = method.doc.summary() {
        section.name = summary.to_string();
    }
    section.description = method.doc.description.clone();
    section.tags = method.doc.tags.clone();
    section.ignore = method.doc.has_tag(IGNORE_TAG);
    section
}
