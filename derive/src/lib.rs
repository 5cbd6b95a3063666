extern crate proc_macro;

mod common;
mod migrate;

use proc_macro::TokenStream;
use syn::parse_macro_input;

/// Expands a directory of revision files into a static `Migrator`.
///
/// ```ignore
/// migrator!(pub MIGRATOR, "migrations");
/// ```
///
/// Every `<revision>_<slug>.rs` file in the directory becomes a private
/// module and a `Migration` entry. A file must declare `REVISION`,
/// `DOWN_REVISION`, `description`, `up` and `down`; `pre_up`, `pre_down`,
/// `post_up` and `post_down` are picked up when present.
#[proc_macro]
pub fn migrator(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as migrate::MigrateInput);
    match migrate::expand_migrator_from_lit_dir(input) {
        Ok(ts) => ts.into(),
        Err(e) => {
            if let Some(parse_err) = e.downcast_ref::<syn::Error>() {
                parse_err.to_compile_error().into()
            } else {
                let msg = e.to_string();
                quote::quote!(::std::compile_error!(#msg)).into()
            }
        }
    }
}
