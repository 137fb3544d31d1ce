//! Plugin codecs example for class-registry.
//!
//! Demonstrates the **self-registering plugin** pattern:
//! - Declare a registry identity over a trait (`Codecs` over `dyn Codec`)
//! - Each codec module exposes a `Registrar` that registers its classes
//! - Start-up runs every registrar once, in a fixed order
//! - Callers create codecs purely by name
//!
//! Run with: `RUST_LOG=debug cargo run --example plugin_codecs`

use class_registry::{define_registry, register_all};
use tracing_subscriber::EnvFilter;

// =============================================================================
// Contract and Registry
// =============================================================================

/// Contract every codec implements.
pub trait Codec: Send {
    fn encode(&self, input: &[u8]) -> Vec<u8>;
    fn decode(&self, input: &[u8]) -> Vec<u8>;
}

define_registry!(pub Codecs, dyn Codec);

// =============================================================================
// Implementation Modules
// =============================================================================

mod identity {
    use class_registry::{ClassRegisterer, Registrar};

    use super::{Codec, Codecs};

    struct Identity;

    impl Codec for Identity {
        fn encode(&self, input: &[u8]) -> Vec<u8> {
            input.to_vec()
        }

        fn decode(&self, input: &[u8]) -> Vec<u8> {
            input.to_vec()
        }
    }

    fn create() -> Box<dyn Codec> {
        Box::new(Identity)
    }

    pub static REGISTRAR: Registrar = Registrar::new("identity", || {
        ClassRegisterer::<Codecs>::new("identity", create);
    });
}

mod rle {
    use class_registry::{ClassRegisterer, Registrar};

    use super::{Codec, Codecs};

    /// Byte-oriented run-length encoding: pairs of (count, byte).
    struct RunLength;

    impl Codec for RunLength {
        fn encode(&self, input: &[u8]) -> Vec<u8> {
            let mut out = Vec::new();
            for chunk in input.chunk_by(|a, b| a == b) {
                for run in chunk.chunks(u8::MAX as usize) {
                    out.push(run.len() as u8);
                    out.push(run[0]);
                }
            }
            out
        }

        fn decode(&self, input: &[u8]) -> Vec<u8> {
            input
                .chunks_exact(2)
                .flat_map(|pair| std::iter::repeat(pair[1]).take(pair[0] as usize))
                .collect()
        }
    }

    fn create() -> Box<dyn Codec> {
        Box::new(RunLength)
    }

    pub static REGISTRAR: Registrar = Registrar::new("rle", || {
        ClassRegisterer::<Codecs>::new("rle", create);
    });
}

// =============================================================================
// Application Code (Knows Names, Not Implementations)
// =============================================================================

fn roundtrip(name: &str, payload: &[u8]) {
    let Some(codec) = Codecs::create_object(name) else {
        println!("   {name}: not registered");
        return;
    };

    let encoded = codec.encode(payload);
    let decoded = codec.decode(&encoded);
    println!(
        "   {name}: {} bytes -> {} bytes, roundtrip ok: {}",
        payload.len(),
        encoded.len(),
        decoded == payload
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== class-registry: Plugin Codecs ===\n");

    // -------------------------------------------------------------------------
    // 1. Run every module's registrations, once, in a fixed order
    // -------------------------------------------------------------------------
    println!("1. Registering codecs...");

    register_all(&[&identity::REGISTRAR, &rle::REGISTRAR]);
    // A second start-up path may call it again without double registration.
    register_all(&[&rle::REGISTRAR]);

    // -------------------------------------------------------------------------
    // 2. Enumerate in registration order
    // -------------------------------------------------------------------------
    println!("\n2. Registered codecs ({}):", Codecs::class_count());
    for index in 0..Codecs::class_count() {
        if let Ok(name) = Codecs::class_name(index) {
            println!("   [{index}] {name}");
        }
    }

    // -------------------------------------------------------------------------
    // 3. Create by name
    // -------------------------------------------------------------------------
    println!("\n3. Round-tripping a payload...");

    let payload = b"aaaaaaaabbbbbbbbbbccccccd";
    for name in ["identity", "rle", "zstd"] {
        roundtrip(name, payload);
    }

    println!("\n=== Example Complete ===");
}
