use shadow_rs::BuildPattern;
use shadow_rs::ShadowBuilder;

fn main() -> std::io::Result<()> {
    // Build metadata for `route-search --version`.
    ShadowBuilder::builder()
        .build_pattern(BuildPattern::Lazy)
        .deny_const(Default::default())
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    Ok(())
}
