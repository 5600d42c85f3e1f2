/// Declares a zero-sized stream key for [`RandomStreams`](crate::random::RandomStreams).
///
/// ```ignore
/// define_rng!(MovementRng);
/// streams.sample_range(MovementRng, 0.0..1.0);
/// ```
///
/// Each key is backed by its own `SmallRng`. Declaring the same name twice anywhere in the
/// crate is a link-time error, so two concerns can never share a stream by accident.
#[macro_export]
macro_rules! define_rng {
    ($stream:ident) => {
        #[derive(Copy, Clone)]
        struct $stream;

        impl $crate::random::RngId for $stream {
            type RngType = $crate::rand::rngs::SmallRng;

            fn get_name() -> &'static str {
                stringify!($stream)
            }
        }

        $crate::paste::paste! {
            #[doc(hidden)]
            #[no_mangle]
            #[allow(non_upper_case_globals)]
            pub static [<random_stream_name_guard_ $stream>]: () = ();
        }
    };
}
pub use define_rng;
