use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Path, Visibility};

/// Derive macro for tag-mapped records.
///
/// Implements `structmap::Record` (static field schema and field access) and
/// `structmap::Field` (so the record can be nested in another record).
///
/// - `#[tag(ns = "key,opt,...")]` on a field declares its tag per namespace.
///   Fields without a tag in the requested namespace are not mapped.
/// - `#[structmap(hook(name = "Name", with = path))]` on the struct declares
///   an override hook. `path(&self)` must return a value implementing
///   `structmap::IntoHookOutputs`, normally a `(key, value)` pair.
///
/// Only `pub` fields are mapped, but every field type must implement
/// `structmap::Field`: a record is zero only when all of its fields are,
/// private ones included.
///
/// # Example
///
/// ```ignore
/// #[derive(Record)]
/// #[structmap(hook(name = "ToMap", with = Self::to_map))]
/// pub struct Price {
///     #[tag(json = "amount", map = "a,omitempty")]
///     pub amount: i64,
///
///     #[tag(json = "-")]
///     pub internal: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(tag, structmap))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

struct Hook {
    name: String,
    with: Path,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Record only supports structs")),
    };

    let hooks = parse_hooks(input)?;

    let mut descriptor_tokens = Vec::new();
    let mut accessor_tokens = Vec::new();
    let mut zero_tokens = Vec::new();
    let mut bounds = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.unraw().to_string();
        let exported = matches!(field.vis, Visibility::Public(_));

        let tags = parse_tags(field)?;
        let tag_tokens = tags.iter().map(|(ns, value)| quote! { (#ns, #value) });

        descriptor_tokens.push(quote! {
            structmap::FieldDescriptor::new(#field_name_str, #exported, &[#(#tag_tokens),*])
        });

        let field_ty = &field.ty;
        bounds.push(quote! { #field_ty: structmap::Field });
        zero_tokens.push(quote! {
            && structmap::Field::is_zero(&self.#field_name)
        });
        if exported {
            accessor_tokens.push(quote! {
                #index => Some(&self.#field_name as &dyn structmap::Field),
            });
        }
    }

    let hook_arms = hooks.iter().map(|Hook { name, with }| {
        quote! {
            #name => Some(structmap::IntoHookOutputs::into_hook_outputs(#with(self))),
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let mut predicates = where_clause
        .map(|w| w.predicates.iter().map(|p| quote! { #p }).collect::<Vec<_>>())
        .unwrap_or_default();
    // Concrete field types are checked by the generated calls; only generic
    // records need the bounds spelled out.
    if input.generics.type_params().next().is_some() {
        predicates.extend(bounds);
    }

    let expanded = quote! {
        impl #impl_generics structmap::Record for #name #ty_generics
        where
            #(#predicates,)*
        {
            fn type_name(&self) -> &'static str {
                #name_str
            }

            fn fields(&self) -> &'static [structmap::FieldDescriptor] {
                const FIELDS: &[structmap::FieldDescriptor] = &[
                    #(#descriptor_tokens),*
                ];
                FIELDS
            }

            fn field(&self, __index: usize) -> Option<&dyn structmap::Field> {
                match __index {
                    #(#accessor_tokens)*
                    _ => None,
                }
            }
        }

        impl #impl_generics structmap::Field for #name #ty_generics
        where
            #(#predicates,)*
        {
            fn kind(&self) -> structmap::Kind<'_> {
                structmap::Kind::Record(self)
            }

            fn is_zero(&self) -> bool {
                true #(#zero_tokens)*
            }

            fn hook(&self, __method: &str) -> Option<structmap::HookOutputs> {
                match __method {
                    #(#hook_arms)*
                    _ => None,
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

/// Parse `#[tag(ns = "value", ...)]` attributes of one field.
fn parse_tags(field: &syn::Field) -> Result<Vec<(String, String)>, syn::Error> {
    let mut tags: Vec<(String, String)> = Vec::new();

    for attr in &field.attrs {
        if !attr.path().is_ident("tag") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let ns = meta
                .path
                .get_ident()
                .ok_or_else(|| meta.error("expected a tag namespace, e.g. `json = \"...\"`"))?
                .unraw()
                .to_string();
            let value: LitStr = meta.value()?.parse()?;
            if tags.iter().any(|(existing, _)| *existing == ns) {
                return Err(meta.error(format!("duplicate tag namespace '{ns}'")));
            }
            tags.push((ns, value.value()));
            Ok(())
        })?;
    }

    Ok(tags)
}

/// Parse `#[structmap(hook(name = "...", with = path))]` attributes.
fn parse_hooks(input: &DeriveInput) -> Result<Vec<Hook>, syn::Error> {
    let mut hooks: Vec<Hook> = Vec::new();

    for attr in &input.attrs {
        if !attr.path().is_ident("structmap") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("hook") {
                return Err(meta.error("unknown structmap attribute (expected `hook`)"));
            }

            let mut name: Option<LitStr> = None;
            let mut with: Option<Path> = None;
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("name") {
                    name = Some(inner.value()?.parse()?);
                } else if inner.path.is_ident("with") {
                    with = Some(inner.value()?.parse()?);
                } else {
                    return Err(inner.error("unknown hook attribute (expected `name` or `with`)"));
                }
                Ok(())
            })?;

            let name = name.ok_or_else(|| meta.error("missing hook `name = \"...\"`"))?;
            let with = with.ok_or_else(|| meta.error("missing hook `with = path`"))?;
            if name.value().is_empty() {
                return Err(syn::Error::new_spanned(&name, "hook name must not be empty"));
            }
            if hooks.iter().any(|h| h.name == name.value()) {
                return Err(syn::Error::new_spanned(
                    &name,
                    format!("duplicate hook '{}'", name.value()),
                ));
            }

            hooks.push(Hook {
                name: name.value(),
                with,
            });
            Ok(())
        })?;
    }

    Ok(hooks)
}
