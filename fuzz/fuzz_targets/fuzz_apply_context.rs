#![no_main]

use libfuzzer_sys::fuzz_target;
use restspec::options::TemplateOptions;
use restspec::template::apply_context_with;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // The first byte picks the split point between template tree and context.
    let split = data[0] as usize % data.len().max(1);
    let (node_bytes, ctx_bytes) = data.split_at(split.min(data.len()));

    let node = serde_json::from_slice::<serde_json::Value>(node_bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(node_bytes).into_owned())
    });
    if let Ok(ctx) = serde_json::from_slice::<serde_json::Value>(ctx_bytes) {
        let _ = apply_context_with(&node, &ctx, &TemplateOptions::default());
        let _ = apply_context_with(&node, &ctx, &TemplateOptions::preserving());
    }
});
