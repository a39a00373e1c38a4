//! JSDoc-style annotations attached to statements.
//!
//! Annotations are produced upstream (by the parser or the type checker) and
//! handed to passes as a read-only [`AnnotationMap`] keyed by statement id.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Display};
use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools as _;
use thiserror::Error;

use super::symbols::{InvalidQualifiedNameError, QualifiedName};
use super::syntax::ast::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidJsDocError {
    #[error("Unterminated type expression in @{tag}")]
    UnterminatedType { tag: String },

    #[error("@{tag} requires a type expression")]
    MissingType { tag: String },

    #[error("@param {{{type_expr}}} is missing a parameter name")]
    MissingParamName { type_expr: String },

    #[error("Invalid @extends target: {0}")]
    InvalidExtends(#[from] InvalidQualifiedNameError),

    #[error("Unexpected text outside of a tag: '{0}'")]
    UnexpectedText(String),
}

/// A warning category named in `@suppress {...}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suppression {
    /// `@suppress {duplicate}`: the definition intentionally repeats another one
    Duplicate,
    /// `@suppress {checkTypes}`
    CheckTypes,
    Other(String),
}

impl From<&str> for Suppression {
    fn from(s: &str) -> Self {
        match s {
            "duplicate" => Suppression::Duplicate,
            "checkTypes" => Suppression::CheckTypes,
            other => Suppression::Other(other.to_string()),
        }
    }
}

impl Display for Suppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suppression::Duplicate => f.write_str("duplicate"),
            Suppression::CheckTypes => f.write_str("checkTypes"),
            Suppression::Other(name) => f.write_str(name),
        }
    }
}

/// How a formal parameter accepts its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Required,
    Optional,
    Rest,
}

impl ParamKind {
    /// Kind declared by a JSDoc type expression: `number=` is optional,
    /// `...number` is rest.
    pub fn from_type_expr(type_expr: &str) -> Self {
        let type_expr = type_expr.trim();
        if type_expr.starts_with("...") {
            ParamKind::Rest
        } else if type_expr.ends_with('=') {
            ParamKind::Optional
        } else {
            ParamKind::Required
        }
    }

    /// Kind implied by the Closure coding convention for undocumented parameters.
    pub fn from_convention(name: &str) -> Self {
        if name == "var_args" {
            ParamKind::Rest
        } else if name.starts_with("opt_") {
            ParamKind::Optional
        } else {
            ParamKind::Required
        }
    }

    /// Resolve the kind of parameter `name`, preferring its `@param` annotation.
    pub fn resolve(name: &str, doc: Option<&JsDocInfo>) -> Self {
        doc.and_then(|doc| doc.param(name))
            .map(|param| ParamKind::from_type_expr(&param.type_expr))
            .unwrap_or_else(|| ParamKind::from_convention(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsDocParam {
    pub name: String,
    pub type_expr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsDocInfo {
    /// `@constructor`
    pub constructor: bool,
    /// `@extends {Base}`
    pub extends: Option<QualifiedName>,
    /// `@override`
    pub is_override: bool,
    /// `@suppress {...}`
    pub suppressions: BTreeSet<Suppression>,
    /// `@wizaction`: invoked through a non-standard dispatch path, never optimize
    pub wizaction: bool,
    pub params: Vec<JsDocParam>,
    /// `@return {T}`
    pub returns: Option<String>,
}

impl JsDocInfo {
    /// Parse the tag text of a JSDoc comment, without the `/**` and `*/` delimiters.
    pub fn parse(text: &str) -> Result<Self, InvalidJsDocError> {
        let mut info = JsDocInfo::default();
        let mut chars = text.chars().peekable();

        loop {
            skip_whitespace(&mut chars);
            match chars.peek() {
                None => break,
                Some('@') => {
                    chars.next();
                }
                Some(_) => {
                    let stray: String = chars.by_ref().take_while(|c| *c != '@').collect();
                    return Err(InvalidJsDocError::UnexpectedText(stray.trim().to_string()));
                }
            }

            let tag: String = take_word(&mut chars);
            match tag.as_str() {
                "constructor" => info.constructor = true,
                "override" => info.is_override = true,
                "wizaction" => info.wizaction = true,
                "extends" => {
                    let type_expr = require_type(&mut chars, &tag)?;
                    info.extends = Some(QualifiedName::new(type_expr.trim())?);
                }
                "suppress" => {
                    let type_expr = require_type(&mut chars, &tag)?;
                    info.suppressions.extend(
                        type_expr
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(Suppression::from),
                    );
                }
                "param" => {
                    let type_expr = require_type(&mut chars, &tag)?;
                    skip_whitespace(&mut chars);
                    let name = take_word(&mut chars);
                    if name.is_empty() {
                        return Err(InvalidJsDocError::MissingParamName { type_expr });
                    }
                    info.params.push(JsDocParam { name, type_expr });
                }
                "return" | "returns" => {
                    info.returns = Some(require_type(&mut chars, &tag)?);
                }
                _ => {
                    // Tags we don't model (@const, @type, ...) may still carry a type.
                    skip_whitespace(&mut chars);
                    if chars.peek() == Some(&'{') {
                        take_type(&mut chars, &tag)?;
                    }
                }
            }
        }

        Ok(info)
    }

    pub fn param(&self, name: &str) -> Option<&JsDocParam> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn has_suppressions(&self) -> bool {
        !self.suppressions.is_empty()
    }

    pub fn suppresses(&self, suppression: &Suppression) -> bool {
        self.suppressions.contains(suppression)
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn take_word(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut word = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$') {
        word.push(c);
    }
    word
}

fn require_type(chars: &mut Peekable<Chars<'_>>, tag: &str) -> Result<String, InvalidJsDocError> {
    skip_whitespace(chars);
    if chars.peek() != Some(&'{') {
        return Err(InvalidJsDocError::MissingType {
            tag: tag.to_string(),
        });
    }
    take_type(chars, tag)
}

/// Consume a braced type expression, returning its contents. Braces may nest.
fn take_type(chars: &mut Peekable<Chars<'_>>, tag: &str) -> Result<String, InvalidJsDocError> {
    chars.next();
    let mut depth = 1;
    let mut type_expr = String::new();
    for c in chars.by_ref() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(type_expr);
                }
            }
            _ => {}
        }
        type_expr.push(c);
    }
    Err(InvalidJsDocError::UnterminatedType {
        tag: tag.to_string(),
    })
}

impl Display for JsDocInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags = Vec::new();
        if self.constructor {
            tags.push("@constructor".to_string());
        }
        if let Some(base) = &self.extends {
            tags.push(format!("@extends {{{}}}", base));
        }
        if self.is_override {
            tags.push("@override".to_string());
        }
        if !self.suppressions.is_empty() {
            tags.push(format!("@suppress {{{}}}", self.suppressions.iter().join(",")));
        }
        if self.wizaction {
            tags.push("@wizaction".to_string());
        }
        for param in &self.params {
            tags.push(format!("@param {{{}}} {}", param.type_expr, param.name));
        }
        if let Some(returns) = &self.returns {
            tags.push(format!("@return {{{}}}", returns));
        }
        write!(f, "{}", tags.join(" "))
    }
}

/// Read-only side table of annotations keyed by the id of the annotated statement.
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    docs: HashMap<NodeId, JsDocInfo>,
}

impl AnnotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, info: JsDocInfo) {
        self.docs.insert(id, info);
    }

    pub fn get(&self, id: NodeId) -> Option<&JsDocInfo> {
        self.docs.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_constructor_with_namespaced_extends() {
        let info = JsDocInfo::parse("@constructor @extends {ns.FooBase}").unwrap();
        assert!(info.constructor);
        assert_eq!(info.extends.unwrap().as_str(), "ns.FooBase");
    }

    #[test]
    fn should_parse_override_with_suppressions() {
        let info = JsDocInfo::parse("@override @suppress {duplicate, checkTypes}").unwrap();
        assert!(info.is_override);
        assert!(info.suppresses(&Suppression::Duplicate));
        assert!(info.suppresses(&Suppression::CheckTypes));
        assert!(!info.wizaction);
    }

    #[test]
    fn should_parse_params_and_return() {
        let info = JsDocInfo::parse(
            "@param {number} time @param {number=} opt_loc @param {...number} var_args @return {number}",
        )
        .unwrap();
        assert_eq!(info.params.len(), 3);
        assert_eq!(info.param("opt_loc").unwrap().type_expr, "number=");
        assert_eq!(info.returns.as_deref(), Some("number"));
    }

    #[test]
    fn should_skip_unknown_tags_and_their_types() {
        let info = JsDocInfo::parse("@const @type {{a: number}} @override").unwrap();
        assert!(info.is_override);
        assert!(info.params.is_empty());
    }

    #[test]
    fn should_reject_unterminated_type() {
        assert_eq!(
            JsDocInfo::parse("@extends {Foo"),
            Err(InvalidJsDocError::UnterminatedType {
                tag: "extends".to_string()
            })
        );
    }

    #[test]
    fn should_reject_param_without_name() {
        assert_eq!(
            JsDocInfo::parse("@param {number}"),
            Err(InvalidJsDocError::MissingParamName {
                type_expr: "number".to_string()
            })
        );
    }

    #[test]
    fn should_reject_extends_without_type() {
        assert_eq!(
            JsDocInfo::parse("@extends Foo"),
            Err(InvalidJsDocError::MissingType {
                tag: "extends".to_string()
            })
        );
    }

    #[test]
    fn should_reject_text_outside_tags() {
        assert_eq!(
            JsDocInfo::parse("Does things. @override"),
            Err(InvalidJsDocError::UnexpectedText("Does things.".to_string()))
        );
    }

    #[test]
    fn should_display_tags_in_canonical_order() {
        let info = JsDocInfo::parse("@suppress {duplicate} @override @wizaction").unwrap();
        assert_eq!(
            info.to_string(),
            "@override @suppress {duplicate} @wizaction"
        );
    }

    #[test]
    fn should_derive_param_kinds_from_types() {
        assert_eq!(ParamKind::from_type_expr("number"), ParamKind::Required);
        assert_eq!(ParamKind::from_type_expr("number="), ParamKind::Optional);
        assert_eq!(ParamKind::from_type_expr("...number"), ParamKind::Rest);
    }

    #[test]
    fn should_fall_back_to_coding_convention() {
        assert_eq!(ParamKind::resolve("time", None), ParamKind::Required);
        assert_eq!(ParamKind::resolve("opt_loc", None), ParamKind::Optional);
        assert_eq!(ParamKind::resolve("var_args", None), ParamKind::Rest);

        let info = JsDocInfo::parse("@param {number} opt_loc").unwrap();
        assert_eq!(
            ParamKind::resolve("opt_loc", Some(&info)),
            ParamKind::Required
        );
    }
}
