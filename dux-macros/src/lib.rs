//! Procedural macros for dux

use darling::{FromDeriveInput, FromField, FromVariant};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    vis: syn::Visibility,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Generate a struct of bound action creators
    #[darling(default)]
    creators: bool,
}

/// Variant-level data
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<ActionField>,
}

#[derive(Debug, FromField)]
struct ActionField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
}

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Method name for a variant; keywords become raw identifiers (`Move` -> `r#move`)
fn method_ident(variant: &syn::Ident) -> syn::Ident {
    let snake = to_snake_case(&variant.to_string());
    syn::parse_str::<syn::Ident>(&snake)
        .unwrap_or_else(|_| syn::Ident::new_raw(&snake, variant.span()))
}

/// Derive macro for the Action trait
///
/// Generates a `name()` method that returns the variant name as a static string.
///
/// With `#[action(creators)]`, also generates `{Name}Creators`: a cloneable
/// struct holding a `dux::Dispatch<{Name}>` with one snake_case method per
/// variant. Each method takes the variant's fields as arguments, dispatches
/// the built action and returns what dispatch returned.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(creators)]
/// enum SongAction {
///     LoadSongs(Vec<Song>),
///     PlaySong(Song),
///     TogglePlay,
/// }
///
/// let action = SongAction::TogglePlay;
/// assert_eq!(action.name(), "TogglePlay");
///
/// let actions = SongActionCreators::new(store.dispatcher());
/// actions.toggle_play();
/// actions.load_songs(songs);
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let variant_str = variant_name.to_string();

        match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #variant_str
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #variant_str
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #variant_str
            },
        }
    });

    let mut expanded = quote! {
        impl dux::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    };

    if opts.creators {
        let vis = &opts.vis;
        let creators_name = format_ident!("{}Creators", name);

        let methods = variants.iter().map(|v| {
            let variant_name = &v.ident;
            let method_name = method_ident(variant_name);
            let doc = format!("Dispatch [`{}::{}`].", name, variant_name);

            let (params, construct) = match &v.fields.style {
                darling::ast::Style::Unit => (Vec::new(), quote! { #name::#variant_name }),
                darling::ast::Style::Tuple => {
                    let args: Vec<_> = (0..v.fields.len())
                        .map(|i| format_ident!("arg{}", i))
                        .collect();
                    let params = v
                        .fields
                        .iter()
                        .zip(&args)
                        .map(|(f, arg)| {
                            let ty = &f.ty;
                            quote! { #arg: #ty }
                        })
                        .collect();
                    (params, quote! { #name::#variant_name(#(#args),*) })
                }
                darling::ast::Style::Struct => {
                    let idents: Vec<_> = v.fields.iter().filter_map(|f| f.ident.as_ref()).collect();
                    let params = v
                        .fields
                        .iter()
                        .zip(&idents)
                        .map(|(f, ident)| {
                            let ty = &f.ty;
                            quote! { #ident: #ty }
                        })
                        .collect();
                    (params, quote! { #name::#variant_name { #(#idents),* } })
                }
            };

            quote! {
                #[doc = #doc]
                pub fn #method_name(&self, #(#params),*) -> #name {
                    self.dispatch.call(#construct)
                }
            }
        });

        let creators_doc = format!(
            "Bound action creators for [`{}`].\n\n\
             Every method builds one variant and dispatches it.",
            name
        );

        expanded = quote! {
            #expanded

            #[doc = #creators_doc]
            #[derive(Clone)]
            #vis struct #creators_name {
                dispatch: dux::Dispatch<#name>,
            }

            impl #creators_name {
                /// Bind the creators to a dispatch function
                pub fn new(dispatch: dux::Dispatch<#name>) -> Self {
                    Self { dispatch }
                }

                #(#methods)*
            }

            impl ::core::fmt::Debug for #creators_name {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.debug_struct(stringify!(#creators_name)).finish_non_exhaustive()
                }
            }
        };
    }

    TokenStream::from(expanded)
}

/// Derive macro that combines per-field slice reducers into one reducer
///
/// Every field must name its slice reducer with `#[reducer(path)]`; the
/// reducer has the shape `fn(&FieldType, &Action) -> FieldType`. The action
/// type is given once on the struct with `#[combine(action = Type)]`.
///
/// Generates `fn reduce(state: &Self, action: &Action) -> Self`, which builds
/// a new value with every field produced by its slice reducer. Pass it straight
/// to `Store::new`.
///
/// # Example
/// ```ignore
/// #[derive(CombineReducers, Clone, Debug, Default)]
/// #[combine(action = SongAction)]
/// struct PlayerState {
///     #[reducer(songs)]
///     songs: Vec<Song>,
///     #[reducer(active_song)]
///     active_song: Option<Song>,
/// }
///
/// let store = Store::new(PlayerState::default(), PlayerState::reduce);
/// ```
#[proc_macro_derive(CombineReducers, attributes(combine, reducer))]
pub fn derive_combine_reducers(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_combine_reducers(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_combine_reducers(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "CombineReducers can only be derived for structs with named fields",
            ));
        }
    };

    let mut action: Option<syn::Type> = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("combine")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("action") {
                action = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `action = Type`"))
            }
        })?;
    }
    let Some(action) = action else {
        return Err(syn::Error::new_spanned(
            name,
            "missing #[combine(action = Type)] on the struct",
        ));
    };

    let mut slices = Vec::with_capacity(fields.len());
    for field in fields {
        let reducer = field
            .attrs
            .iter()
            .find(|a| a.path().is_ident("reducer"))
            .ok_or_else(|| {
                syn::Error::new_spanned(field, "every field needs a #[reducer(path)] attribute")
            })?
            .parse_args::<syn::Path>()?;
        let ident = &field.ident;
        slices.push(quote! { #ident: #reducer(&state.#ident, action) });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let doc = format!(
        "Combined reducer for [`{}`]: runs every field's slice reducer and builds a new value.",
        name
    );

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #[doc = #doc]
            pub fn reduce(state: &Self, action: &#action) -> Self {
                Self {
                    #(#slices,)*
                }
            }
        }
    })
}
