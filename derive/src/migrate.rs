use crate::common::{resolve_path, Result};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, ToTokens, TokenStreamExt};
use sha2::{Digest, Sha384};
use std::fs::{metadata, read_dir, read_to_string};
use std::path::Path;
use syn::parse::Parse;
use syn::token::Super;
use syn::{Expr, Item, Lit, LitStr, Token, VisRestricted, Visibility};

pub(crate) struct MigrateInput {
    pub_token: Option<Token![pub]>,
    ident: Ident,
    _comma: Token![,],
    path: LitStr,
}

impl Parse for MigrateInput {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let pub_token = if input.peek(Token![pub]) {
            Some(input.parse()?)
        } else {
            None
        };

        Ok(Self {
            pub_token,
            ident: input.parse()?,
            _comma: input.parse()?,
            path: input.parse()?,
        })
    }
}

#[derive(Default)]
struct QuotedMigration {
    revision: String,
    checksum: Vec<u8>,

    has_pre_up: bool,
    has_post_up: bool,
    has_pre_down: bool,
    has_post_down: bool,
}

impl QuotedMigration {
    fn mod_name(&self) -> Ident {
        Ident::new(&format!("revision_{}", self.revision), Span::call_site())
    }
}

impl ToTokens for QuotedMigration {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let QuotedMigration {
            checksum,
            has_pre_up,
            has_post_up,
            has_pre_down,
            has_post_down,
            ..
        } = &self;

        let mod_name = self.mod_name();
        let optional = |present: bool, func: &str| {
            let func = Ident::new(func, Span::call_site());
            if present {
                quote! { Some(&#mod_name::#func) }
            } else {
                quote! { None }
            }
        };

        let pre_up_ref = optional(*has_pre_up, "pre_up");
        let pre_down_ref = optional(*has_pre_down, "pre_down");
        let post_up_ref = optional(*has_post_up, "post_up");
        let post_down_ref = optional(*has_post_down, "post_down");

        let ts = quote! {
            ::schemaline::migrate::Migration {
                revision: #mod_name::REVISION,
                down_revision: #mod_name::DOWN_REVISION,
                description: &#mod_name::description,
                up: &#mod_name::up,
                down: &#mod_name::down,
                pre_up: #pre_up_ref,
                pre_down: #pre_down_ref,
                post_up: #post_up_ref,
                post_down: #post_down_ref,
                checksum: ::std::borrow::Cow::Borrowed(&[
                    #(#checksum),*
                ]),
            }
        };

        tokens.append_all(ts);
    }
}

pub(crate) fn expand_migrator_from_lit_dir(migrate_input: MigrateInput) -> Result<TokenStream> {
    let path = resolve_path(migrate_input.path.value(), migrate_input.path.span())?;
    expand_migrator(&path, &migrate_input.ident, &migrate_input.pub_token)
}

/// Reads the string literal assigned to `const <name>: &str`.
fn const_str_value(item: &Item, name: &str) -> Option<String> {
    let Item::Const(item_const) = item else {
        return None;
    };

    if item_const.ident != name {
        return None;
    }

    match item_const.expr.as_ref() {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Str(s) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn expand_migrator(
    path: &Path,
    migrator_name: &Ident,
    pub_token: &Option<Token![pub]>,
) -> Result<TokenStream> {
    let mut migrations = Vec::new();
    let mut migrations_mods = Vec::new();

    let mut entries = read_dir(path)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if !metadata(entry.path())?.is_file() {
            // not a file; ignore
            continue;
        }

        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();

        if !file_name.ends_with(".rs") {
            continue;
        }

        // <revision>_<slug>.rs
        let stem = &file_name[..file_name.len() - 3];
        let revision = stem.split('_').next().unwrap_or_default();
        if revision.is_empty() || !revision.chars().all(|c| c.is_ascii_alphanumeric()) {
            continue;
        }

        let migration_file = read_to_string(entry.path())?;
        let checksum = Vec::from(Sha384::digest(migration_file.as_bytes()).as_slice());

        let mut quoted_migration = QuotedMigration {
            revision: revision.to_string(),
            checksum,
            ..Default::default()
        };

        let mut declared_revision = None;
        let mut program = syn::parse_file(&migration_file)?;
        for item in program.items.iter_mut() {
            if let Some(value) = const_str_value(item, "REVISION") {
                declared_revision = Some(value);
            }

            let super_vis = || -> syn::Result<Visibility> {
                Ok(Visibility::Restricted(VisRestricted {
                    pub_token: Default::default(),
                    paren_token: Default::default(),
                    in_token: None,
                    path: Box::new(syn::Path::from(syn::parse_str::<Super>("super")?)),
                }))
            };

            match item {
                Item::Const(item_const) => {
                    item_const.vis = super_vis()?;
                }
                Item::Fn(func) => {
                    func.vis = super_vis()?;

                    match func.sig.ident.to_string().as_str() {
                        "pre_up" => quoted_migration.has_pre_up = true,
                        "pre_down" => quoted_migration.has_pre_down = true,
                        "post_up" => quoted_migration.has_post_up = true,
                        "post_down" => quoted_migration.has_post_down = true,
                        _ => (),
                    }
                }
                _ => (),
            }
        }

        match declared_revision {
            Some(declared) if declared == revision => (),
            Some(declared) => {
                return Err(format!(
                    "{}: REVISION \"{}\" does not match the file name",
                    file_name, declared
                )
                .into());
            }
            None => {
                return Err(format!("{}: missing `const REVISION: &str`", file_name).into());
            }
        }

        let mod_name = quoted_migration.mod_name();
        let full_path = entry.path().to_string_lossy().to_string();
        let attrs = &program.attrs;
        let items = &program.items;
        let migration_tokens: TokenStream = quote! {
            mod #mod_name {
                #(#attrs)*

                // this tells the compiler to watch this path for changes
                const _: &[u8] = include_bytes!(#full_path);

                #(#items)*
            }
        };

        migrations_mods.push(migration_tokens);
        migrations.push(quoted_migration);
    }

    let token_stream: TokenStream = quote! {
        #pub_token static #migrator_name: ::schemaline::migrate::Migrator = ::schemaline::migrate::Migrator::new(
            ::std::borrow::Cow::Borrowed(&[
                #(#migrations),*
            ]),
            true,
        );

        #(#migrations_mods)*
    };

    Ok(token_stream)
}
