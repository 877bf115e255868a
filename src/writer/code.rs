//! The code writer: template substitution, indentation and dependency capture

use std::sync::Arc;

use crate::config::RuntimeConfig;
use crate::error::CodegenError;
use crate::manifest::Manifest;
use crate::symbol::{Dependency, Reference};

use super::template::{self, Args, Segment};
use super::{TemplateArg, Writable};

const INDENT: &str = "    ";

/// Accumulates the source of one module
///
/// Every reference written through the writer is resolved against the
/// writer's module and its dependency is recorded in the writer's manifest,
/// so emitted text and declared dependencies cannot drift apart.
#[derive(Debug)]
pub struct CodeWriter {
    config: Arc<RuntimeConfig>,
    module: String,
    buffer: String,
    indent: usize,
    manifest: Manifest,
}

impl CodeWriter {
    /// Create a writer for the module at `module` (e.g. `crate::config`)
    pub fn new(config: Arc<RuntimeConfig>, module: impl Into<String>) -> Self {
        Self {
            config,
            module: module.into(),
            buffer: String::new(),
            indent: 0,
            manifest: Manifest::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Source written so far
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    /// Resolve a reference for this module and record its dependency
    pub fn resolve(&mut self, reference: &Reference) -> Result<String, CodegenError> {
        let resolved = reference.resolve(&self.module)?;
        tracing::trace!(
            module = %self.module,
            text = %resolved.display_text,
            "resolved reference"
        );
        if let Some(dependency) = resolved.dependency {
            self.manifest.register(dependency)?;
        }
        Ok(resolved.display_text)
    }

    /// Record a dependency without writing anything
    pub fn register(&mut self, dependency: Dependency) -> Result<&mut Self, CodegenError> {
        self.manifest.register(dependency)?;
        Ok(self)
    }

    /// Write a template with positional `#T` placeholders
    pub fn write(&mut self, template: &str, args: &[TemplateArg<'_>]) -> Result<&mut Self, CodegenError> {
        self.render(template, Args::positional(args))
    }

    /// Write a template with named `#{name}` placeholders
    pub fn write_named(
        &mut self,
        template: &str,
        args: &[(&str, TemplateArg<'_>)],
    ) -> Result<&mut Self, CodegenError> {
        self.render(template, Args::named(args))
    }

    /// Write a deferred chunk at the current indentation
    pub fn write_writable(&mut self, writable: &Writable<'_>) -> Result<&mut Self, CodegenError> {
        writable.write_to(self)?;
        Ok(self)
    }

    /// Write `header {`, the indented body, then `}`
    pub fn block(
        &mut self,
        header: &str,
        args: &[TemplateArg<'_>],
        body: impl FnOnce(&mut Self) -> Result<(), CodegenError>,
    ) -> Result<&mut Self, CodegenError> {
        self.write(&format!("{} {{", header), args)?;
        self.indent();
        body(self)?;
        self.dedent();
        self.write("}", &[])
    }

    /// Consume the writer, returning the source and the dependencies it needs
    pub fn finish(self) -> (String, Manifest) {
        (self.buffer, self.manifest)
    }

    fn child(&self) -> CodeWriter {
        CodeWriter::new(self.config.clone(), self.module.clone())
    }

    fn render(&mut self, template: &str, mut args: Args<'_, '_>) -> Result<&mut Self, CodegenError> {
        let mut lines = Vec::new();

        for line in template::dedent(template) {
            let leading = &line[..line.len() - line.trim_start().len()];
            let mut rendered = String::new();
            let mut substituted = false;

            for segment in template::segments(line)? {
                match segment {
                    Segment::Literal(text) => rendered.push_str(text),
                    Segment::Hash => rendered.push('#'),
                    Segment::Positional => {
                        let arg = args.next_positional()?;
                        rendered.push_str(&self.render_arg(arg, leading)?);
                        substituted = true;
                    }
                    Segment::Named(name) => {
                        let arg = args.lookup(name)?;
                        rendered.push_str(&self.render_arg(arg, leading)?);
                        substituted = true;
                    }
                }
            }

            // A line that only held placeholders which rendered to nothing disappears
            if substituted && rendered.trim().is_empty() {
                continue;
            }
            lines.push(rendered);
        }
        args.finish()?;

        for line in &lines {
            self.push_lines(line);
        }
        Ok(self)
    }

    fn render_arg(&mut self, arg: &TemplateArg<'_>, leading: &str) -> Result<String, CodegenError> {
        let text = match arg {
            TemplateArg::Reference(reference) => return self.resolve(reference),
            TemplateArg::Text(text) => text.to_string(),
            TemplateArg::Writable(writable) => {
                let mut child = self.child();
                writable.write_to(&mut child)?;
                let (source, manifest) = child.finish();
                self.manifest.merge(manifest)?;
                source.trim_end_matches('\n').to_string()
            }
        };
        Ok(text.replace('\n', &format!("\n{}", leading)))
    }

    fn push_lines(&mut self, text: &str) {
        for line in text.split('\n') {
            if line.trim().is_empty() {
                self.buffer.push('\n');
            } else {
                for _ in 0..self.indent {
                    self.buffer.push_str(INDENT);
                }
                self.buffer.push_str(line.trim_end());
                self.buffer.push('\n');
            }
        }
    }
}
