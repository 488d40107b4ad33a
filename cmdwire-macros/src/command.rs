use crate::utils::{apply_derives, denies_unknown_fields, field_on_wire};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream};

const DISCRIMINATOR: &str = "commandname";

/// #[command] 宏实现
/// - 仅支持具名字段结构体（负载须序列化为 JSON 对象）
/// - 合并/追加派生：Debug, Clone, Serialize, Deserialize
/// - 生成 `::cmdwire::Command` 实现，`NAME` 取 `name = "..."`，缺省为结构体名
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand_struct(attr, item) {
        Ok(out) => out.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_struct(attr: TokenStream, item: TokenStream) -> Result<proc_macro2::TokenStream> {
    let cfg: CommandAttrConfig = syn::parse(attr)?;
    let input: Item = syn::parse(item)?;

    let mut st = match input {
        Item::Struct(s) => s,
        Item::Enum(e) => return Err(syn::Error::new(e.ident.span(), "#[command] only on struct")),
        other => return Err(syn::Error::new(other.span(), "#[command] only on struct")),
    };

    let syn::Fields::Named(fields) = &st.fields else {
        return Err(syn::Error::new(
            st.ident.span(),
            "#[command] supports only named-field struct, e.g., struct X { a: T }",
        ));
    };

    // 判别字段由注册表写入，负载中同名字段会在序列化时被覆盖
    if let Some(field) = field_on_wire(&st.attrs, fields, DISCRIMINATOR)? {
        let span = field.ident.as_ref().map_or_else(|| field.span(), |i| i.span());
        return Err(syn::Error::new(
            span,
            "`commandname` is reserved for the wire discriminator",
        ));
    }

    if denies_unknown_fields(&st.attrs) {
        return Err(syn::Error::new(
            st.ident.span(),
            "#[serde(deny_unknown_fields)] would reject the `commandname` field on decode",
        ));
    }

    let required: [syn::Path; 4] = [
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    apply_derives(&mut st.attrs, &required)?;

    let ident = &st.ident;
    let name_lit = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        #st

        impl #impl_generics ::cmdwire::Command for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name_lit;
        }
    })
}

// -------- parsing --------

struct CommandAttrConfig {
    name: Option<syn::LitStr>,
}

impl Parse for CommandAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut name: Option<syn::LitStr> = None;
        let pairs: Punctuated<CommandAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in pairs {
            match elem {
                CommandAttrElem::Name(lit) => {
                    if name.is_some() {
                        return Err(syn::Error::new(lit.span(), "duplicate key 'name' in attribute"));
                    }
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "command name must not be empty"));
                    }
                    name = Some(lit);
                }
            }
        }
        Ok(Self { name })
    }
}

enum CommandAttrElem {
    Name(syn::LitStr),
}

impl Parse for CommandAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "name" {
            let _eq: Token![=] = input.parse()?;
            let lit: syn::LitStr = input.parse()?;
            Ok(Self::Name(lit))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'name'",
            ))
        }
    }
}
