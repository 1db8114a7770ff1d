//! element! macro: parse HTML-like syntax and generate `ElementSpec` builder code.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// Right-hand side of an attribute.
#[derive(Clone)]
pub(crate) enum AttrValue {
    /// `name="value"`
    Lit(LitStr),
    /// `name={expr}`
    Expr(Expr),
    /// Bare `name`, a presence flag.
    Flag,
}

/// A parsed attribute. Dashed names (`data-id`) are joined.
#[derive(Clone)]
pub(crate) struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            AttrValue::Lit(lit) => format!("{:?}", lit.value()),
            AttrValue::Expr(_) => "{..}".to_owned(),
            AttrValue::Flag => "true".to_owned(),
        };
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("value", &value)
            .finish()
    }
}

/// Something inside an element's body.
#[derive(Clone)]
pub(crate) enum Child {
    Element(Element),
    /// A string literal, becomes the element's text.
    Text(String),
    /// `{expr}`, anything convertible into `Addable`.
    Expr(Box<Expr>),
}

impl std::fmt::Debug for Child {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Child::Element(elem) => elem.fmt(f),
            Child::Text(text) => write!(f, "Text({text:?})"),
            Child::Expr(_) => f.write_str("Expr({..})"),
        }
    }
}

/// A parsed element: `<tag attrs... />` or `<tag attrs...> children </tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Child>,
    pub self_closing: bool,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field("self_closing", &self.self_closing)
            .finish()
    }
}

/// The top-level element! input: a sequence of elements.
#[derive(Debug)]
struct ElementInput {
    elements: Vec<Element>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for ElementInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut elements = Vec::new();
        while !input.is_empty() {
            elements.push(parse_element(input)?);
        }
        Ok(ElementInput { elements })
    }
}

/// Parse `name` or `name-with-dashes`, keywords allowed (`for`, `type`).
fn parse_name(input: ParseStream) -> Result<(String, Span)> {
    let first = Ident::parse_any(input)?;
    let span = first.span();
    let mut name = first.to_string();
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        let part = Ident::parse_any(input)?;
        name.push('-');
        name.push_str(&part.to_string());
    }
    Ok((name, span))
}

fn parse_braced_expr(input: ParseStream) -> Result<Expr> {
    let content;
    braced!(content in input);
    content.parse()
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    // Expect `<`
    input.parse::<Token![<]>()?;

    let (tag, tag_span) = parse_name(input)?;

    // Parse attributes until we hit `/>` or `>`
    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing: true,
            });
        }

        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let (name, _) = parse_name(input)?;
        let value = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            if input.peek(syn::token::Brace) {
                AttrValue::Expr(parse_braced_expr(input)?)
            } else {
                AttrValue::Lit(input.parse()?)
            }
        } else {
            AttrValue::Flag
        };
        attrs.push(Attribute { name, value });
    }

    // Parse children until closing tag `</tag>`.
    let mut children = Vec::new();
    loop {
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let (closing, closing_span) = parse_name(input)?;
            if closing != tag {
                return Err(Error::new(
                    closing_span,
                    format!("mismatched closing tag: expected `</{tag}>`, found `</{closing}>`"),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        if input.peek(Token![<]) {
            children.push(Child::Element(parse_element(input)?));
        } else if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            children.push(Child::Text(lit.value()));
        } else if input.peek(syn::token::Brace) {
            children.push(Child::Expr(Box::new(parse_braced_expr(input)?)));
        } else if input.is_empty() {
            return Err(Error::new(tag_span, format!("unclosed element `<{tag}>`")));
        } else {
            return Err(input.error("expected a child element, a string, `{expr}` or `</` to close the parent"));
        }
    }

    Ok(Element {
        tag,
        attrs,
        children,
        self_closing: false,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Generate code for a single element.
fn generate_element(elem: &Element) -> TokenStream {
    let tag = &elem.tag;
    let mut calls = Vec::new();

    for attr in &elem.attrs {
        let value = match &attr.value {
            AttrValue::Lit(lit) => quote! { #lit },
            AttrValue::Expr(expr) => quote! { #expr },
            AttrValue::Flag => quote! { true },
        };
        let call = match attr.name.as_str() {
            "id" => quote! { .id(#value) },
            "class" => quote! { .class(#value) },
            "text" => quote! { .text(#value) },
            "html" => quote! { .html(#value) },
            name => quote! { .attr(#name, #value) },
        };
        calls.push(call);
    }

    for child in &elem.children {
        match child {
            Child::Element(child) => {
                let code = generate_element(child);
                calls.push(quote! { .child(#code) });
            }
            Child::Text(text) => calls.push(quote! { .text(#text) }),
            Child::Expr(expr) => calls.push(quote! { .child(#expr) }),
        }
    }

    quote! {
        ::element_forms::dom::ElementSpec::new(#tag) #(#calls)*
    }
}

/// Entry point: generate code for the entire element! macro.
///
/// One root yields an `ElementSpec`; several yield a `Vec<ElementSpec>`.
pub(crate) fn element_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: ElementInput = syn::parse2(input)?;

    match parsed.elements.as_slice() {
        [] => Err(Error::new(
            Span::call_site(),
            "element! macro requires at least one element",
        )),
        [single] => Ok(generate_element(single)),
        many => {
            let exprs = many.iter().map(generate_element);
            Ok(quote! { ::std::vec![#(#exprs),*] })
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn parse_input(tokens: TokenStream) -> Result<ElementInput> {
        syn::parse2(tokens)
    }

    fn parse_single_element(tokens: TokenStream) -> Result<Element> {
        syn::parse2::<ElementInput>(tokens).map(|v| v.elements.into_iter().next().unwrap())
    }

    // -----------------------------------------------------------------------
    // Parsing tests
    // -----------------------------------------------------------------------

    #[test]
    fn parse_self_closing_element() {
        let elem = parse_single_element(quote! { <input type="text" /> }).unwrap();
        assert_eq!(elem.tag, "input");
        assert!(elem.self_closing);
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.attrs[0].name, "type");
        assert!(matches!(&elem.attrs[0].value, AttrValue::Lit(lit) if lit.value() == "text"));
    }

    #[test]
    fn parse_keyword_and_dashed_names() {
        let elem = parse_single_element(quote! { <label for="x" data-field-id="7" /> }).unwrap();
        let names: Vec<&str> = elem.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["for", "data-field-id"]);
    }

    #[test]
    fn parse_flag_and_expr_attributes() {
        let elem = parse_single_element(quote! { <input checked value={count} /> }).unwrap();
        assert!(matches!(elem.attrs[0].value, AttrValue::Flag));
        assert!(matches!(elem.attrs[1].value, AttrValue::Expr(_)));
    }

    #[test]
    fn parse_element_with_children() {
        let elem = parse_single_element(quote! {
            <div class="ce-unit">
                <label for="age">"Age"</label>
                <div>{control}</div>
            </div>
        })
        .unwrap();
        assert_eq!(elem.children.len(), 2);
        let Child::Element(label) = &elem.children[0] else {
            panic!("expected element");
        };
        assert!(matches!(&label.children[0], Child::Text(t) if t == "Age"));
        let Child::Element(wrapper) = &elem.children[1] else {
            panic!("expected element");
        };
        assert!(matches!(wrapper.children[0], Child::Expr(_)));
    }

    #[test]
    fn parse_multiple_root_elements() {
        let input = parse_input(quote! {
            <p />
            <p />
        })
        .unwrap();
        assert_eq!(input.elements.len(), 2);
    }

    #[test]
    fn parse_error_mismatched_closing_tag() {
        let result = parse_single_element(quote! {
            <div>
                <span />
            </section>
        });
        let err = result.unwrap_err().to_string();
        assert!(err.contains("mismatched closing tag"));
    }

    #[test]
    fn parse_error_unclosed() {
        let result = parse_single_element(quote! { <div> <span /> });
        assert!(result.unwrap_err().to_string().contains("unclosed element"));
    }

    // -----------------------------------------------------------------------
    // Code generation tests
    // -----------------------------------------------------------------------

    #[test]
    fn codegen_self_closing() {
        let elem = parse_single_element(quote! { <input type="checkbox" checked /> }).unwrap();
        let code = generate_element(&elem).to_string();
        assert!(code.contains("ElementSpec :: new (\"input\")"), "{code}");
        assert!(code.contains(". attr (\"type\" , \"checkbox\")"), "{code}");
        assert!(code.contains(". attr (\"checked\" , true)"), "{code}");
    }

    #[test]
    fn codegen_id_class_text() {
        let elem = parse_single_element(quote! {
            <button id="save" class="ce-cmd" text={label} />
        })
        .unwrap();
        let code = generate_element(&elem).to_string();
        assert!(code.contains(". id (\"save\")"), "{code}");
        assert!(code.contains(". class (\"ce-cmd\")"), "{code}");
        assert!(code.contains(". text (label)"), "{code}");
    }

    #[test]
    fn codegen_children() {
        let elem = parse_single_element(quote! {
            <div>
                "Hello"
                <span />
                {other}
            </div>
        })
        .unwrap();
        let code = generate_element(&elem).to_string();
        assert!(code.contains(". text (\"Hello\")"), "{code}");
        assert!(code.contains(". child (:: element_forms :: dom :: ElementSpec :: new (\"span\"))"), "{code}");
        assert!(code.contains(". child (other)"), "{code}");
    }

    #[test]
    fn codegen_many_roots_is_vec() {
        let code = element_impl(quote! { <p /> <p /> }).unwrap().to_string();
        assert!(code.starts_with(":: std :: vec !"), "{code}");
    }

    #[test]
    fn codegen_empty_is_error() {
        let result = element_impl(quote! {});
        assert!(result.unwrap_err().to_string().contains("at least one element"));
    }
}
