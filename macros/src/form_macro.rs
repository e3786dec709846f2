//! form! macro: parse markup-like syntax and generate formbridge tree-building code.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{Error, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// A parsed attribute: `name="value"`.
#[derive(Clone)]
pub(crate) struct Attribute {
    pub name: Ident,
    pub value: LitStr,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name.to_string())
            .field("value", &self.value.value())
            .finish()
    }
}

/// A parsed element: `<Tag attrs... />` or `<Tag attrs...> children </Tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Element>,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .finish()
    }
}

impl Element {
    fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name == name)
    }
}

/// The form! input: a sequence of root elements (exactly one is accepted).
#[derive(Debug)]
struct FormInput {
    elements: Vec<Element>,
}

/// Tags accepted by the macro; each maps to a snake_case `Widget` constructor.
const WIDGET_TAGS: &[&str] = &[
    "Form",
    "Panel",
    "Label",
    "Button",
    "TextField",
    "CheckBox",
    "RadioButton",
    "ComboBox",
    "NumericSpinner",
    "DatePicker",
    "TabStrip",
    "ScrollBar",
];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for FormInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut elements = Vec::new();
        while !input.is_empty() {
            elements.push(parse_element(input)?);
        }
        Ok(FormInput { elements })
    }
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let tag: Ident = input.parse()?;

    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
            });
        }

        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let attr_name: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let attr_value: LitStr = input.parse()?;
        attrs.push(Attribute {
            name: attr_name,
            value: attr_value,
        });
    }

    let mut children = Vec::new();
    loop {
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag: Ident = input.parse()?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!(
                        "mismatched closing tag: expected `</{}>`, found `</{}>`",
                        tag, closing_tag
                    ),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        if input.peek(Token![<]) {
            children.push(parse_element(input)?);
        } else {
            return Err(input.error("expected `<` to start a child element or `</` to close the parent"));
        }
    }

    Ok(Element {
        tag,
        attrs,
        children,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// `TextField` -> `text_field`.
fn snake_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 4);
    for (i, ch) in tag.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn bool_attr(attr: &Attribute) -> Result<bool> {
    match attr.value.value().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::new(
            attr.value.span(),
            format!("`{}` must be \"true\" or \"false\"", attr.name),
        )),
    }
}

/// The `NodeData` expression for one element (children excluded).
fn generate_node(elem: &Element) -> Result<TokenStream> {
    let tag_str = elem.tag.to_string();
    if !WIDGET_TAGS.contains(&tag_str.as_str()) {
        return Err(Error::new(
            elem.tag.span(),
            format!("unknown widget `<{tag_str}>`"),
        ));
    }
    let Some(name) = elem.attr("name") else {
        return Err(Error::new(
            elem.tag.span(),
            format!("`<{tag_str}>` requires a `name` attribute"),
        ));
    };
    let name = &name.value;
    let constructor = format_ident!("{}", snake_case(&tag_str), span = elem.tag.span());

    let mut builder_calls = Vec::new();
    for attr in &elem.attrs {
        let val = &attr.value;
        match attr.name.to_string().as_str() {
            "name" => {}
            "title" => builder_calls.push(quote! { .with_text(#val) }),
            "enabled" => {
                let flag = bool_attr(attr)?;
                builder_calls.push(quote! { .enabled(#flag) });
            }
            "visible" => {
                let flag = bool_attr(attr)?;
                builder_calls.push(quote! { .visible(#flag) });
            }
            other => {
                let method_name = Ident::new(&format!("with_{other}"), attr.name.span());
                builder_calls.push(quote! { .#method_name(#val) });
            }
        }
    }

    Ok(quote! {
        ::formbridge::widget::NodeData::new(
            #name,
            ::formbridge::widget::Widget::#constructor(),
        ) #(#builder_calls)*
    })
}

/// Statements inserting `elem` (under `parent`, or as root) and its subtree.
fn generate_inserts(
    elem: &Element,
    parent: Option<&Ident>,
    counter: &mut usize,
    out: &mut Vec<TokenStream>,
) -> Result<()> {
    let node = generate_node(elem)?;
    let id = format_ident!("__node{}", *counter);
    *counter += 1;
    out.push(match parent {
        Some(parent) => quote! { let #id = __tree.insert_child(#parent, #node); },
        None => quote! { let #id = __tree.insert(#node); },
    });
    for child in &elem.children {
        generate_inserts(child, Some(&id), counter, out)?;
    }
    Ok(())
}

/// Entry point: generate code for the entire form! macro.
pub(crate) fn form_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: FormInput = syn::parse2(input)?;

    let root = match parsed.elements.as_slice() {
        [] => {
            return Err(Error::new(
                Span::call_site(),
                "form! macro requires a root `<Form>` element",
            ))
        }
        [root] => root,
        [_, extra, ..] => {
            return Err(Error::new(
                extra.tag.span(),
                "form! macro accepts exactly one root element",
            ))
        }
    };
    if root.tag != "Form" {
        return Err(Error::new(root.tag.span(), "the root element must be `<Form>`"));
    }

    let mut counter = 0;
    let mut inserts = Vec::new();
    generate_inserts(root, None, &mut counter, &mut inserts)?;

    Ok(quote! {
        {
            let mut __tree = ::formbridge::widget::WidgetTree::new();
            #(#inserts)*
            __tree
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================
