//! Runs the `restgen` binary against documents on disk.

use std::fs;
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

const PETSTORE: &str = r#"
swagger: "2.0"
info: {title: Pets, version: "1"}
paths:
  /pets/{petId}:
    get:
      parameters:
        - {name: petId, in: path, required: true, type: integer}
      responses:
        200:
          description: OK
          schema:
            type: array
            items: {$ref: '#/definitions/Pet'}
definitions:
  Pet:
    type: object
    required: [name]
    properties:
      name: {type: string}
"#;

fn restgen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_restgen"));
    cmd.env_remove("RUST_LOG")
        .env_remove("RESTGEN_OUT_DIR")
        .env_remove("RESTGEN_CONFIG")
        .env_remove("RESTGEN_LOG_FORMAT");
    cmd
}

#[test]
fn generate_writes_descriptor_manifest() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("petstore.yaml");
    fs::write(&input, PETSTORE).unwrap();
    let out_dir = dir.path().join("out");

    let output = restgen()
        .arg("generate")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("descriptors.json")).unwrap())
            .unwrap();
    let endpoint = &manifest["endpoints"][0];
    assert_eq!(endpoint["class_name"], "PetsPetIdView");
    assert_eq!(endpoint["verbs"][0]["function_name"], "get_pets_pet_id");
    assert_eq!(endpoint["verbs"][0]["many"], true);
    assert!(manifest["serializers"]["#/definitions/Pet"].is_object());
}

#[test]
fn check_prints_summary_without_writing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("petstore.yaml");
    fs::write(&input, PETSTORE).unwrap();

    let output = restgen().arg("check").arg(&input).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("endpoint   PetsPetIdView /pets/{petId} [GET]"));
    assert!(stdout.contains("serializer PetSerializer #/definitions/Pet"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn invalid_document_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.yaml");
    fs::write(
        &input,
        r#"
openapi: 3.0.0
paths:
  /items/{id}:
    get:
      responses:
        '200': {description: OK}
"#,
    )
    .unwrap();
    let out_dir = dir.path().join("out");

    let output = restgen()
        .arg("generate")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!out_dir.join("descriptors.json").exists());
}
