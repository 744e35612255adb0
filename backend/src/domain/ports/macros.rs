//! `define_port_error!`: declare a port error enum with snake_case constructors.
//!
//! Every variant carries named fields. Each variant `Foo { a: A, b: B }`
//! gains `fn foo(a: impl Into<A>, b: impl Into<B>) -> Self`, so adapters can
//! write `TimerRepositoryError::query("boom")`.

macro_rules! define_port_error {
    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*)) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant () () $($field : $ty,)*);
            )*
        }
    };
}

pub(crate) use define_port_error;
