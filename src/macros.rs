//! Candidate declaration macro
//!
//! `candidate!` builds a [`CandidateSpec`](crate::domain::CandidateSpec) for
//! a concrete type registered against a base capability. Each listed
//! constructor names an associated function of the type; parameters are
//! received as `Arc<P>` in declaration order.
//!
//! ```ignore
//! let spec = candidate! {
//!     TodoHandler as dyn Handler {
//!         new(repo: TodoRepository, settings: Settings);
//!         unconfigured(repo: TodoRepository);
//!     }
//! };
//! ```

/// Declare a candidate type and its constructors.
#[macro_export]
macro_rules! candidate {
    ($ty:ty as $base:ty { $( $ctor:ident ( $( $p:ident : $pty:ty ),* $(,)? ) );* $(;)? }) => {
        $crate::domain::CandidateSpec {
            type_name: ::std::any::type_name::<$ty>(),
            type_id: ::std::any::TypeId::of::<$ty>(),
            base_id: ::std::any::TypeId::of::<$base>(),
            constructors: ::std::vec![
                $(
                    $crate::domain::ConstructorSpec::new(
                        ::std::vec![ $( $crate::domain::ServiceKey::of::<$pty>() ),* ],
                        |__args| {
                            let _ = &__args;
                            #[allow(unused_mut)]
                            let mut __index = 0usize;
                            $(
                                let $p: ::std::sync::Arc<$pty> = __args.get(__index)?;
                                __index += 1;
                            )*
                            let _ = __index;
                            ::std::result::Result::Ok(
                                ::std::sync::Arc::new(<$ty>::$ctor( $( $p ),* ))
                                    as $crate::domain::ServiceInstance,
                            )
                        },
                    )
                ),*
            ],
        }
    };
}
