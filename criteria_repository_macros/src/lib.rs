mod model;

use proc_macro::TokenStream;

/// Derive macro for the `Model` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Model)]
/// #[model(collection = "users")]
/// struct User {
///     #[model(id)]
///     pub user_id: String,
///     pub active: bool,
/// }
/// ```
///
/// Without `#[model(collection = "...")]` the collection defaults to the
/// snake_case struct name followed by `s`. Without a field marked
/// `#[model(id)]` the field named `id` is used.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
