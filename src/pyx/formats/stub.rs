//! Declaration stubs
//!
//! [`StubWriter`] renders one construct at a time. Every rendered stub ends with
//! a newline; top-level stubs are separated by a blank line. Bodies are
//! rendered one indentation unit deep and nested stubs are re-indented as a
//! block, so the writer never needs to know how deep it is.

use crate::pyx::ast::{
    ClassHeader, Construct, DataClass, Docstring, EnumClass, FunctionHeader, Import, ImportName, Struct,
    TypedFunctionKind,
};
use crate::pyx::config::StubConfig;
use crate::pyx::formats::expression::{render_parameter, render_type, ParameterStyle};

/// Renders constructs as stub text
#[derive(Debug, Clone, Copy)]
pub struct StubWriter<'a> {
    config: &'a StubConfig,
}

impl<'a> StubWriter<'a> {
    pub fn new(config: &'a StubConfig) -> Self {
        Self { config }
    }

    /// Render a sequence of top-level constructs
    pub fn render_all<'c>(&self, constructs: impl IntoIterator<Item = &'c Construct>) -> String {
        constructs
            .into_iter()
            .map(|construct| self.render(construct))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(&self, construct: &Construct) -> String {
        match construct {
            Construct::ImportSection(imports) => self.imports(imports),
            Construct::Function(function) => {
                self.function(&function.header, function.docstring.as_ref(), ParameterStyle::Plain)
            }
            Construct::TypedFunction(function) => {
                self.function(&function.header, function.docstring.as_ref(), ParameterStyle::Typed)
            }
            Construct::Class(class) => self.class(&class.header, class.docstring.as_ref(), &class.members),
            Construct::TypedClass(class) => self.class(&class.header, class.docstring.as_ref(), &class.members),
            Construct::EnumClass(class) => self.enum_class(class),
            Construct::Struct(structure) => self.structure(structure),
            Construct::DataClass(class) => self.dataclass(class),
        }
    }

    /// Whether a class member appears in its class's stub
    pub fn is_exposed(member: &Construct) -> bool {
        match member {
            Construct::TypedFunction(function) => function.kind == TypedFunctionKind::Checked,
            Construct::Struct(_) | Construct::ImportSection(_) => false,
            _ => true,
        }
    }

    fn function(&self, header: &FunctionHeader, docstring: Option<&Docstring>, style: ParameterStyle) -> String {
        let mut out = format!("def {}({})", header.name, self.parameters(header, style));
        if let Some(returns) = &header.returns {
            out.push_str(" -> ");
            out.push_str(&render_type(returns, self.config));
        }
        out.push_str(":\n");
        out.push_str(&self.docstring(docstring));
        out.push_str(&self.config.indent);
        out.push_str("...\n");
        out
    }

    /// Parameters on one line, or one per line when that line is too long
    fn parameters(&self, header: &FunctionHeader, style: ParameterStyle) -> String {
        let rendered: Vec<String> = header
            .parameters
            .iter()
            .map(|parameter| render_parameter(parameter, style, self.config))
            .collect();
        let single_line = rendered.join(", ");
        if single_line.chars().count() <= self.config.line_width {
            return single_line;
        }

        let mut wrapped = String::from("\n");
        for parameter in &rendered {
            wrapped.push_str(&self.config.indent);
            wrapped.push_str(parameter);
            wrapped.push_str(",\n");
        }
        wrapped
    }

    fn class_line(&self, header: &ClassHeader) -> String {
        if header.parents.is_empty() {
            format!("class {}:\n", header.name)
        } else {
            format!("class {}({}):\n", header.name, header.parents.join(", "))
        }
    }

    fn class(&self, header: &ClassHeader, docstring: Option<&Docstring>, members: &[Construct]) -> String {
        let mut out = self.class_line(header);
        let docstring = self.docstring(docstring);
        out.push_str(&docstring);

        let rendered: Vec<String> = members
            .iter()
            .filter(|member| Self::is_exposed(member))
            .map(|member| self.indent_block(&self.render(member)))
            .collect();
        if rendered.is_empty() {
            out.push_str(&self.placeholder());
            return out;
        }
        if !docstring.is_empty() {
            out.push('\n');
        }
        out.push_str(&rendered.join("\n"));
        out
    }

    fn enum_class(&self, class: &EnumClass) -> String {
        let mut out = self.class_line(&class.header);
        out.push_str(&self.docstring(class.docstring.as_ref()));
        out.push_str(&self.verbatim(&class.lines));
        out
    }

    fn structure(&self, structure: &Struct) -> String {
        let mut out = format!("class {}:\n", structure.name);
        out.push_str(&self.docstring(structure.docstring.as_ref()));
        if structure.fields.is_empty() {
            out.push_str(&self.placeholder());
        }
        for field in &structure.fields {
            out.push_str(&format!(
                "{}{}: {}\n",
                self.config.indent,
                field.name,
                render_type(&field.field_type, self.config)
            ));
        }
        out
    }

    fn dataclass(&self, class: &DataClass) -> String {
        let mut out = format!(
            "@dataclass{}\n",
            class.decorator_arguments.as_deref().unwrap_or_default()
        );
        out.push_str(&self.class_line(&class.header));
        out.push_str(&self.docstring(class.docstring.as_ref()));
        out.push_str(&self.verbatim(&class.lines));
        out
    }

    fn imports(&self, imports: &[Import]) -> String {
        imports.iter().map(|import| self.import(import)).collect()
    }

    fn import(&self, import: &Import) -> String {
        match import {
            Import::Plain(names) => format!("import {}\n", import_names(names)),
            Import::From { module, names } if names.len() <= 2 => {
                format!("from {} import {}\n", module, import_names(names))
            }
            Import::From { module, names } => {
                let mut out = format!("from {} import (\n", module);
                for name in names {
                    out.push_str(&format!("{}{},\n", self.config.indent, import_name(name)));
                }
                out.push_str(")\n");
                out
            }
        }
    }

    /// Docstring lines, one unit deep; empty when there is no docstring
    ///
    /// Continuation lines are re-based on their common margin and a closing
    /// line holding only whitespace becomes the bare closing quotes, so a
    /// rendered docstring renders back to itself.
    fn docstring(&self, docstring: Option<&Docstring>) -> String {
        let Some(docstring) = docstring else {
            return String::new();
        };
        let indent = &self.config.indent;
        let lines: Vec<&str> = docstring.text.split('\n').collect();
        let margin = lines
            .iter()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.len() - line.trim_start().len())
            .min()
            .unwrap_or(0);

        let first = match lines.len() {
            1 => lines[0],
            _ => lines[0].trim_end(),
        };
        let mut out = format!("{}{}\"\"\"{}", indent, docstring.prefix, first);
        let last = lines.len() - 1;
        for (position, line) in lines.iter().enumerate().skip(1) {
            out.push('\n');
            if line.trim().is_empty() {
                if position == last {
                    out.push_str(indent);
                }
                continue;
            }
            out.push_str(indent);
            out.push_str(line.get(margin..).unwrap_or(line.trim_start()).trim_end());
        }
        out.push_str("\"\"\"\n");
        out
    }

    /// Verbatim body lines one unit deep, or the placeholder
    fn verbatim(&self, lines: &[String]) -> String {
        if lines.is_empty() {
            return self.placeholder();
        }
        lines
            .iter()
            .map(|line| format!("{}{}\n", self.config.indent, line))
            .collect()
    }

    fn placeholder(&self) -> String {
        format!("{}...\n", self.config.indent)
    }

    /// Indent every non-blank line of `block` by one unit
    fn indent_block(&self, block: &str) -> String {
        block
            .split_inclusive('\n')
            .map(|line| {
                if line.trim().is_empty() {
                    line.trim_start_matches([' ', '\t']).to_string()
                } else {
                    format!("{}{}", self.config.indent, line)
                }
            })
            .collect()
    }
}

fn import_name(name: &ImportName) -> String {
    match &name.alias {
        Some(alias) => format!("{} as {}", name.name, alias),
        None => name.name.clone(),
    }
}

fn import_names(names: &[ImportName]) -> String {
    names.iter().map(import_name).collect::<Vec<_>>().join(", ")
}
