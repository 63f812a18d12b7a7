use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SynthError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SynthError::sampling("x")
            .to_string()
            .contains("sampling error:")
    );
    assert!(SynthError::layout("x").to_string().contains("layout error:"));
    assert!(
        SynthError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(SynthError::label("x").to_string().contains("label error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk full");
    let err = SynthError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk full"));
}
