use crate::config::Members;
use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::output::MarkupBuffer;
use crate::renderer::traits::*;

impl Render for Param {
    fn render(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        let types = TypeRenderer::render_types(self);
        let name = self.name.as_deref().unwrap_or_default();
        context.emit(out, &FieldRenderer::field("param", &[types.as_str(), name], &self.describe()));
    }
}

impl Render for ReturnValue {
    fn render(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        let description = self.describe();
        if !description.is_empty() {
            context.emit(out, &FieldRenderer::field("returns", &[], &description));
        }
        if !self.type_names().is_empty() {
            let types = context.xref.xref_union(self.type_names());
            context.emit(out, &FieldRenderer::field("rtype", &[], &types));
        }
    }
}

impl Render for Throws {
    fn render(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        let types = context.xref.xref_union(self.type_names());
        context.emit(out, &FieldRenderer::field("raises", &[types.as_str()], &self.describe()));
    }
}

impl Render for SeeRef {
    fn render(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        let link = if self.is_external() {
            self.link.clone()
        } else {
            context.xref.xref(&self.link)
        };
        let line = format!("See: {} {}", link, self.description);
        context.emit(out, line.trim_end());
        context.blank(out);
    }
}

impl Render for Doclet {
    fn render(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        if self.ignore {
            return;
        }
        let context = context.located(self.source_location(context.forest));

        match &self.kind {
            DocletKind::Module => self.render_module(&context, out),
            DocletKind::Class => self.render_class(&context, out),
            DocletKind::Function => self.render_callable("function", &context, out),
            DocletKind::Method => self.render_callable("method", &context, out),
            DocletKind::Member => self.render_member(&context, out),
            DocletKind::Constant => self.render_constant(&context, out),
            DocletKind::File => self.render_file(&context, out),
            DocletKind::Package => self.render_package(&context, out),
            DocletKind::Other(_) => self.render_children(&context, out),
            DocletKind::Untyped => {}
        }
    }
}

impl Doclet {
    /// Description, a blank line, then any `@see` references.
    fn render_description(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        context.emit(out, &self.describe());
        context.blank(out);
        for see in &self.see {
            see.render(context, out);
        }
    }

    /// All children in link order, then a blank line.
    fn render_children(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        for &child in self.children() {
            context.forest.get(child).render(context, out);
        }
        context.blank(out);
    }

    fn render_module(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        if !self.is_documented() {
            return;
        }
        let module = self.module_name();

        context.emit(out, &format!(".. js:module:: {module}"));
        context.blank(out);

        if context.options.title {
            context.emit(out, module);
            context.emit(out, &"-".repeat(module.chars().count()));
            context.blank(out);
            context.blank(out);
        }

        self.render_description(context, out);

        match &context.options.members {
            Members::All => self.render_children(context, out),
            Members::Only(names) => {
                for &child in self.children() {
                    let child = context.forest.get(child);
                    if names.iter().any(|name| name == child.display_name()) {
                        child.render(context, out);
                    }
                }
            }
            Members::None => {}
        }
    }

    fn render_class(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        if !self.is_documented() {
            return;
        }
        context.emit(out, &format!(".. js:class:: {}", self.display_name()));
        context.blank(out);

        let body = context.nested();
        self.render_description(&body, out);
        self.render_children(&body, out);
    }

    fn render_callable(&self, directive: &str, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        if !self.is_documented() {
            return;
        }
        context.emit(out, &format!(".. js:{directive}:: {}", self.signature()));
        context.blank(out);

        let body = context.nested();
        self.render_description(&body, out);

        if !self.params.is_empty() {
            for param in &self.params {
                param.render(&body, out);
            }
            body.blank(out);
        }

        if !self.returns.is_empty() {
            for ret in &self.returns {
                ret.render(&body, out);
            }
            body.blank(out);
        }

        if !self.exceptions.is_empty() {
            for throws in &self.exceptions {
                throws.render(&body, out);
            }
            body.blank(out);
        }
    }

    /// `(Type)` then the description, shared by attributes and constants.
    fn render_value_body(&self, body: &RenderContext<'_>, out: &mut MarkupBuffer) {
        if !self.type_names().is_empty() {
            body.emit(out, &format!("({})", body.xref.xref_union(self.type_names())));
        }
        self.render_description(body, out);
    }

    fn render_member(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        if !self.is_documented() {
            return;
        }
        context.emit(out, &format!(".. js:attribute:: {}", self.display_name()));
        context.blank(out);
        self.render_value_body(&context.nested(), out);
    }

    fn render_constant(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        if !self.is_documented() {
            return;
        }
        context.emit(out, &format!(".. js:data:: {}", self.display_name()));
        context.blank(out);

        let body = context.nested();
        if let Some(value) = self.literal_value() {
            body.emit(out, ".. code:: javascript");
            body.blank(out);
            body.nested().emit(out, &value);
            body.blank(out);
        }
        self.render_value_body(&body, out);
    }

    /// The header always renders; undocumented children still gate themselves.
    fn render_file(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        context.emit(out, &format!("File: {}", self.display_name()));
        context.blank(out);
        self.render_description(context, out);
        self.render_children(context, out);
    }

    fn render_package(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer) {
        for &file in self.file_children() {
            context.forest.get(file).render(context, out);
        }
        self.render_children(context, out);
    }
}
