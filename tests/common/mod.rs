use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Nothing listens on the discard port; the helper is unreachable in tests
// unless a file-backed catalog is supplied.
pub const DEAD_HELPER: &str = "http://127.0.0.1:9";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");
        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("decoswap");
        cmd.env("HOME", &self.home)
            .arg("--helper")
            .arg(DEAD_HELPER);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_err(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }

    /// Homestead layout with 5 Lantern props and 3 Bench props.
    pub fn write_layout(&self) -> PathBuf {
        let path = self.work.join("layout.xml");
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <Decorations mapId=\"1558\" mapName=\"Hearth's Glow\" type=\"0\">\n\
               <!-- Garden Path -->\n",
        );
        for n in 0..5 {
            xml.push_str(&format!(
                "  <prop name=\"Lantern\" id=\"101\" x=\"{}\" y=\"0\" z=\"0\" />\n",
                n
            ));
        }
        for n in 0..3 {
            xml.push_str(&format!(
                "  <prop name=\"Bench\" id=\"102\" x=\"{}\" y=\"1\" z=\"0\" />\n",
                n
            ));
        }
        xml.push_str("</Decorations>\n");
        fs::write(&path, xml).expect("write layout fixture");
        path
    }

    /// Catalog file: Lantern maps both ways, Bench has no guild hall id.
    pub fn write_catalog(&self) -> PathBuf {
        let path = self.work.join("catalog.json");
        let catalog = serde_json::json!([
            {"name": "Lantern", "homesteadId": 101, "guildUpgradeId": 42},
            {"name": "Bench", "homesteadId": 102, "guildUpgradeId": null},
            {"name": "Fountain", "homesteadId": 103, "guildUpgradeId": 55}
        ]);
        fs::write(&path, catalog.to_string()).expect("write catalog fixture");
        path
    }
}
