//! `#[orm(...)]` attribute parsing shared by both derives.

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta, Result, Token};

/// One `key` or `key = "value"` item of an `#[orm(...)]` list.
pub(crate) enum OrmArg {
    Flag(syn::Path),
    Str(syn::Path, LitStr),
}

impl OrmArg {
    pub(crate) fn path(&self) -> &syn::Path {
        match self {
            OrmArg::Flag(path) | OrmArg::Str(path, _) => path,
        }
    }
}

/// Collect the items of every `#[orm(...)]` attribute in `attrs`.
pub(crate) fn orm_args(attrs: &[Attribute]) -> Result<Vec<OrmArg>> {
    let mut out = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let nested = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in nested {
            match meta {
                Meta::Path(path) => out.push(OrmArg::Flag(path)),
                Meta::NameValue(nv) => match nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => out.push(OrmArg::Str(nv.path, s)),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "expected a string literal",
                        ));
                    }
                },
                Meta::List(list) => {
                    return Err(syn::Error::new_spanned(
                        list,
                        "nested lists are not supported in #[orm(...)]",
                    ));
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn unknown(arg: &OrmArg, allowed: &str) -> syn::Error {
    syn::Error::new_spanned(
        arg.path(),
        format!("unknown orm attribute; expected one of: {allowed}"),
    )
}
