//! Expansion of `#[derive(ErrorKind)]`.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{punctuated::Punctuated, Data, DeriveInput, Error, Expr, Fields, MetaNameValue, Result, Token};

/// The tags of the `#[error(...)]` attribute.
#[derive(Default)]
struct Tags {
    message: Option<Expr>,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl Tags {
    /// Reads the tags from the `error` attribute of the input.
    fn from_input(input: &DeriveInput) -> Result<Self> {
        let Some(attr) = input.attrs.iter().find(|attr| attr.path().is_ident("error")) else {
            return Err(Error::new_spanned(&input.ident, "`ErrorKind` requires an `#[error(...)]` attribute"));
        };

        let mut tags = Tags::default();
        let pairs = attr.parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)?;
        for pair in pairs {
            let slot = if pair.path.is_ident("message") {
                &mut tags.message
            } else if pair.path.is_ident("labels") {
                &mut tags.labels
            } else if pair.path.is_ident("help") {
                &mut tags.help
            } else {
                return Err(Error::new_spanned(&pair.path, "unknown tag, expected `message`, `labels` or `help`"));
            };
            *slot = Some(pair.value);
        }

        Ok(tags)
    }
}

/// Builds a `let` statement that brings each named field of `self` into scope.
fn bind_fields(input: &DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(name, "`ErrorKind` can only be derived for structs"));
    };

    match &data.fields {
        Fields::Named(fields) => {
            let names = fields.named.iter().map(|field| &field.ident);
            Ok(quote! { let #name { #(#names),* } = self; })
        },
        Fields::Unnamed(_) => Err(Error::new_spanned(name, "`ErrorKind` cannot be derived for tuple structs")),
        Fields::Unit => Ok(TokenStream2::new()),
    }
}

/// Generates the `ErrorKind` implementation.
pub fn expand(input: DeriveInput) -> Result<TokenStream2> {
    let tags = Tags::from_input(&input)?;
    let name = &input.ident;
    let message = tags.message
        .ok_or_else(|| Error::new_spanned(name, "the `error` attribute requires a `message` tag"))?;
    let bindings = bind_fields(&input)?;
    let labels = tags.labels
        .map_or_else(|| quote! { Vec::<String>::new() }, |labels| quote! { #labels });
    let help = tags.help.map(|help| quote! { builder.set_help(#help); });

    Ok(quote! {
        impl calx_error::ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn message(&self) -> String {
                #[allow(unused_variables)]
                #bindings
                let message = #message;
                message.to_string()
            }

            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[std::ops::Range<usize>],
            ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                #[allow(unused_variables)]
                #bindings

                // one label per span, in order; an empty text leaves the span unlabeled
                let labels = (#labels)
                    .into_iter()
                    .zip(spans)
                    .map(|(text, span)| {
                        let text = text.to_string();
                        let label = ariadne::Label::new((src_id, span.clone()))
                            .with_color(calx_error::EXPR);
                        if text.is_empty() {
                            label
                        } else {
                            label.with_message(text)
                        }
                    })
                    .collect::<Vec<_>>();

                let offset = spans.first().map_or(0, |span| span.start);
                let mut builder = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                    .with_message(#message)
                    .with_labels(labels);
                #help
                builder.finish()
            }
        }
    })
}
