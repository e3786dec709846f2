//! Proc macros for formbridge: `form!` declarative widget trees.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `formbridge`.

use proc_macro::TokenStream;

mod form_macro;

/// Declarative widget tree macro.
///
/// Expands to an expression of type `formbridge::widget::WidgetTree`.
///
/// # Syntax
///
/// - `<Tag name="..." />`: element without children
/// - `<Tag name="..."> ... </Tag>`: element with children
/// - exactly one root element, which must be `<Form>`
///
/// Tags are widget kinds in CamelCase (`Button`, `TextField`, `ComboBox`,
/// `NumericSpinner`, ...).
///
/// # Attributes
///
/// - `name` is required and becomes the control name
/// - `title` becomes `.with_text(..)`
/// - `enabled` / `visible` take `"true"` or `"false"`
/// - any other attribute becomes a `.with_<attr>("value")` builder call
///
/// # Example
///
/// ```ignore
/// let tree = form! {
///     <Form name="Panel" title="Orders">
///         <Button name="Btn1" text="Send" />
///         <ComboBox name="Symbol" items="EURUSD|GBPUSD" />
///     </Form>
/// };
/// ```
#[proc_macro]
pub fn form(input: TokenStream) -> TokenStream {
    form_macro::form_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
