use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const V1: &str = r#"
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="Document" type="Person"/>
    <xs:complexType name="Person">
        <xs:sequence>
            <xs:element name="name" type="xs:string" minOccurs="1"/>
            <xs:element name="age" type="xs:int" minOccurs="0"/>
        </xs:sequence>
    </xs:complexType>
</xs:schema>
"#;

const V2: &str = r#"
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="Document" type="Person"/>
    <xs:complexType name="Person">
        <xs:sequence>
            <xs:element name="name" type="xs:string" minOccurs="1"/>
            <xs:element name="age" type="xs:int" minOccurs="1"/>
            <xs:element name="email" type="xs:string" minOccurs="0"/>
        </xs:sequence>
    </xs:complexType>
</xs:schema>
"#;

fn cargo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mx"))
}

fn write_schema(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("temporary schema should be writable");
    path
}

fn run_compare(old: &Path, new: &Path) -> Output {
    Command::new(cargo_bin())
        .args([
            "compare",
            old.to_string_lossy().as_ref(),
            new.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run mx compare")
}

#[test]
fn compare_reports_added_and_changed_paths() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let old = write_schema(dir.path(), "v1.xsd", V1);
    let new = write_schema(dir.path(), "v2.xsd", V2);

    let output = run_compare(&old, &new);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let diff: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(diff["added"], serde_json::json!(["Document/email"]));
    assert_eq!(diff["removed"], serde_json::json!([]));
    assert_eq!(diff["changed"][0]["path"], "Document/age");
    assert_eq!(diff["changed"][0]["oldRequirement"], "optional");
    assert_eq!(diff["changed"][0]["newRequirement"], "mandatory");
}

#[test]
fn compare_identical_schemas_yields_empty_diff() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let old = write_schema(dir.path(), "v1.xsd", V1);
    let new = write_schema(dir.path(), "v1-copy.xsd", V1);

    let output = run_compare(&old, &new);
    assert!(output.status.success());

    let diff: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(diff["added"], serde_json::json!([]));
    assert_eq!(diff["removed"], serde_json::json!([]));
    assert_eq!(diff["changed"], serde_json::json!([]));
}
