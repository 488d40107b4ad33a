use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Field, FieldsNamed, LitStr, Token};

// 以路径末段作为派生的身份：`Serialize` 与 `serde::Serialize` 视为同一个
fn derive_ident(p: &syn::Path) -> Option<&syn::Ident> {
    p.segments.last().map(|s| &s.ident)
}

/// 把 `required` 并入已有的 `#[derive(...)]`
///
/// 所有 derive 折叠成位于最前的一个属性（serde 的辅助属性必须出现在其后）；
/// `required` 排在前面，用户写的同名派生被吸收，其余按原顺序保留。
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: &[syn::Path]) -> syn::Result<()> {
    let mut derives: Vec<syn::Path> = required.to_vec();
    let mut rest = Vec::with_capacity(attrs.len());

    for attr in std::mem::take(attrs) {
        if !attr.path().is_ident("derive") {
            rest.push(attr);
            continue;
        }
        let listed = attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)?;
        for p in listed {
            if !derives.iter().any(|d| derive_ident(d) == derive_ident(&p)) {
                derives.push(p);
            }
        }
    }

    attrs.push(syn::parse_quote!(#[derive(#(#derives),*)]));
    attrs.extend(rest);
    Ok(())
}

// 跳过不关心的 serde 键：`key = value` 或 `key(...)`，裸键无需处理
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

/// serde 中可分两端取值的键（`rename`/`rename_all`）
#[derive(Default)]
struct BothSides {
    ser: Option<String>,
    de: Option<String>,
}

// 读取 `#[serde(key = "..")]` 或 `#[serde(key(serialize = "..", deserialize = ".."))]`，
// 同时收集 `alias = ".."`
fn serde_sides(attrs: &[Attribute], key: &str) -> syn::Result<(BothSides, Vec<String>)> {
    let mut sides = BothSides::default();
    let mut aliases = Vec::new();

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                if meta.input.peek(Token![=]) {
                    let v = meta.value()?.parse::<LitStr>()?.value();
                    sides.ser = Some(v.clone());
                    sides.de = Some(v);
                } else {
                    meta.parse_nested_meta(|side| {
                        let v = side.value()?.parse::<LitStr>()?.value();
                        if side.path.is_ident("serialize") {
                            sides.ser = Some(v);
                        } else if side.path.is_ident("deserialize") {
                            sides.de = Some(v);
                        }
                        Ok(())
                    })?;
                }
            } else if meta.path.is_ident("alias") {
                aliases.push(meta.value()?.parse::<LitStr>()?.value());
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok((sides, aliases))
}

fn pascal_case(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

// 按 serde 对字段的 `rename_all` 规则改写；未知规则 serde 自会报错，这里原样返回
fn rename_field(rule: &str, field: &str) -> String {
    match rule {
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => pascal_case(field),
        "camelCase" => {
            let pascal = pascal_case(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => pascal,
            }
        }
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_ascii_uppercase().replace('_', "-"),
        _ => field.to_string(),
    }
}

/// 字段在 JSON 中可能出现的全部名字：序列化名、反序列化名与别名
fn wire_names(field: &Field, rename_all: &BothSides) -> syn::Result<Vec<String>> {
    let Some(ident) = &field.ident else {
        return Ok(Vec::new());
    };
    let raw = ident.unraw().to_string();
    let (rename, aliases) = serde_sides(&field.attrs, "rename")?;

    let side = |explicit: Option<String>, rule: &Option<String>| {
        explicit.unwrap_or_else(|| match rule {
            Some(rule) => rename_field(rule, &raw),
            None => raw.clone(),
        })
    };
    let mut names = vec![
        side(rename.ser, &rename_all.ser),
        side(rename.de, &rename_all.de),
    ];
    names.extend(aliases);
    Ok(names)
}

/// 查找在线上以 `name` 出现的字段（计入 `rename`、`rename_all` 与 `alias`）
pub(crate) fn field_on_wire<'a>(
    container: &[Attribute],
    fields: &'a FieldsNamed,
    name: &str,
) -> syn::Result<Option<&'a Field>> {
    let (rename_all, _) = serde_sides(container, "rename_all")?;
    for field in &fields.named {
        if wire_names(field, &rename_all)?.iter().any(|n| n == name) {
            return Ok(Some(field));
        }
    }
    Ok(None)
}

// 是否存在 #[serde(deny_unknown_fields)]
pub(crate) fn denies_unknown_fields(attrs: &[Attribute]) -> bool {
    attrs.iter().filter(|a| a.path().is_ident("serde")).any(|a| {
        let mut found = false;
        let _ = a.parse_nested_meta(|meta| {
            if meta.path.is_ident("deny_unknown_fields") {
                found = true;
                Ok(())
            } else {
                skip_meta(&meta)
            }
        });
        found
    })
}
