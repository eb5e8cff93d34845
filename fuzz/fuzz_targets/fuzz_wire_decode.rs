#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The decoder must be total over arbitrary datagrams: either a record
    // or a BadLength error, never a panic.
    let _ = glide_net::wire::decode(data);
});
