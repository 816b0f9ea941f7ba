/// Generates the dependency trait and the service struct holding its dependencies.
///
/// Every listed dependency becomes an associated type of the `Deps` trait and an
/// `Arc` field of the struct. Plain fields which are not part of the dependency
/// trait can be appended in a `with { .. }` block.
#[macro_export]
macro_rules! gen_service_impl {
    (
        struct $service_name:ident : $trait:path = $dependencies:ident {
            $($field_name:ident: $field_type:path = $field_attr:ident),* $(,)?
        }
    ) => {
        $crate::gen_service_impl! {
            struct $service_name : $trait = $dependencies {
                $($field_name: $field_type = $field_attr),*
            }
            with {}
        }
    };
    (
        struct $service_name:ident : $trait:path = $dependencies:ident {
            $($field_name:ident: $field_type:path = $field_attr:ident),* $(,)?
        }
        with {
            $($extra_attr:ident: $extra_type:ty),* $(,)?
        }
    ) => {
            pub trait $dependencies {
                type Transaction: dao::Transaction + Send + Sync + Clone + std::fmt::Debug + 'static;
                $(
                    type $field_name: $field_type + Sync + Send;
                )*
            }

            pub struct $service_name<Deps: $dependencies> {
                $(
                    pub $field_attr: std::sync::Arc<Deps::$field_name>,
                )*
                $(
                    pub $extra_attr: $extra_type,
                )*
            }
    };
}
