use proc_macro2::TokenStream;
use quote::quote;
use scribe_model::{QualifiedName, TypeRef};

use crate::error::EmitError;
use crate::registry::RegistrySpec;
use crate::resolver::ExternalAdapterBinding;

// -----------------------------------------------------------------------------
// Paths

/// Prints a qualified name as a Rust path (`a.b.C` → `a::b::C`).
///
/// Name validation guarantees identifier segments, but a segment that is a
/// Rust keyword still cannot appear in a path; that surfaces here as
/// [`EmitError::InvalidPath`].
pub fn qualified_path(name: &QualifiedName) -> Result<syn::Path, EmitError> {
    let joined = name.segments().collect::<Vec<_>>().join("::");
    syn::parse_str(&joined).map_err(|_| EmitError::InvalidPath(name.clone()))
}

fn companion_path(binding: &ExternalAdapterBinding) -> Result<syn::Path, EmitError> {
    let companion = binding
        .companion_factory()
        .and_then(TypeRef::name)
        .ok_or_else(|| EmitError::MissingCompanion {
            adapter: binding.adapter().clone(),
        })?;
    qualified_path(companion)
}

// -----------------------------------------------------------------------------
// EmitConfig

/// Where the emitted code links to.
///
/// The generated registry references the serialization runtime (the
/// `AdapterFactory` trait, the context handle, the requested-type token) by
/// path; front ends resolve that path the same way a derive resolves its
/// own crate.
#[derive(Clone, Debug)]
pub struct EmitConfig {
    runtime_path: syn::Path,
    registry_ident: syn::Ident,
}

impl EmitConfig {
    /// A config emitting against the given runtime crate path, with the
    /// generated dispatch struct named `Registry`.
    pub fn new(runtime_path: &str) -> Result<Self, EmitError> {
        let runtime_path = syn::parse_str(runtime_path)
            .map_err(|_| EmitError::InvalidRuntimePath(runtime_path.to_owned()))?;
        let registry_ident = syn::Ident::new("Registry", proc_macro2::Span::call_site());
        Ok(Self { runtime_path, registry_ident })
    }

    /// Renames the generated dispatch struct.
    pub fn with_registry_ident(mut self, ident: &str) -> Result<Self, EmitError> {
        self.registry_ident = syn::parse_str(ident)
            .map_err(|_| EmitError::InvalidRegistryIdent(ident.to_owned()))?;
        Ok(self)
    }
}

// -----------------------------------------------------------------------------
// Registry emission

/// Prints the dispatch object a [`RegistrySpec`] describes.
///
/// The emitted struct carries the package→index match, the lazily-populated
/// slot array, and a `create` that instantiates each recorded sub-factory
/// at most once before delegating — the same semantics the
/// [`Dispatcher`](crate::Dispatcher) model implements.
pub fn registry_tokens(spec: &RegistrySpec, config: &EmitConfig) -> Result<TokenStream, EmitError> {
    let runtime = &config.runtime_path;
    let ident = &config.registry_ident;
    let len = spec.len();

    let mut index_arms = Vec::with_capacity(len);
    for (package, index) in spec.packages() {
        let package = package.as_str();
        index_arms.push(quote! {
            #package => ::core::option::Option::Some(#index),
        });
    }

    let mut factory_arms = Vec::with_capacity(len);
    for (index, sub) in spec.sub_factories().iter().enumerate() {
        let factory = qualified_path(sub.factory())?;
        factory_arms.push(quote! {
            #index => ::std::boxed::Box::new(<#factory>::new()),
        });
    }

    Ok(quote! {
        pub struct #ident {
            slots: [::core::cell::OnceCell<::std::boxed::Box<dyn #runtime::AdapterFactory>>; #len],
        }

        impl #ident {
            pub fn new() -> Self {
                Self {
                    slots: [const { ::core::cell::OnceCell::new() }; #len],
                }
            }

            fn package_index(package: &str) -> ::core::option::Option<usize> {
                match package {
                    #(#index_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn instantiate(index: usize) -> ::std::boxed::Box<dyn #runtime::AdapterFactory> {
                match index {
                    #(#factory_arms)*
                    _ => ::core::unreachable!(),
                }
            }

            pub fn create(
                &self,
                context: &#runtime::Context,
                request: &#runtime::TypeToken,
            ) -> ::core::option::Option<::std::boxed::Box<dyn #runtime::Adapter>> {
                let index = Self::package_index(request.package())?;
                let factory = self.slots[index].get_or_init(|| Self::instantiate(index));
                factory.create(context, request)
            }
        }
    })
}

// -----------------------------------------------------------------------------
// Binding emission

impl ExternalAdapterBinding {
    /// Prints the instantiation expression for this binding.
    ///
    /// A two-parameter constructor threads the context handle and a freshly
    /// constructed companion factory. Constructors with more parameters
    /// additionally forward the calling type's already-resolved adapter
    /// dependencies positionally; `extra` supplies those expressions, and
    /// its length must equal [`forwarded_deps`](Self::forwarded_deps).
    pub fn initializer_tokens(
        &self,
        context: &TokenStream,
        extra: &[TokenStream],
    ) -> Result<TokenStream, EmitError> {
        let expected = self.forwarded_deps();
        if extra.len() != expected {
            return Err(EmitError::DependencyMismatch {
                adapter: self.adapter().clone(),
                expected,
                actual: extra.len(),
            });
        }

        let adapter = qualified_path(self.adapter())?;
        let companion = companion_path(self)?;

        Ok(if extra.is_empty() {
            quote! { #adapter::new(#context, #companion::new()) }
        } else {
            quote! { #adapter::new(#context, #companion::new(), #(#extra),*) }
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
