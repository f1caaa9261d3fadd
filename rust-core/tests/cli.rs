use assert_cmd::cargo::cargo_bin_cmd;
use std::error::Error;
use std::io::Write;

fn write_input(dir: &std::path::Path) -> Result<std::path::PathBuf, Box<dyn Error>> {
    let path = dir.join("xyz.csv");
    let mut file = std::fs::File::create(&path)?;
    for i in 0..2000 {
        let t = i as f64 / 1000.0;
        let v = (1.0 + 0.5 * (2.0 * std::f64::consts::PI * 10.0 * t).sin())
            * (2.0 * std::f64::consts::PI * 100.0 * t).sin();
        writeln!(file, "{},{},{}", v, v, v)?;
    }
    Ok(path)
}

#[test]
fn writes_envelope_and_spectrum_files() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_input(dir.path())?;
    let config = dir.path().join("run.toml");
    std::fs::write(&config, "lowcut = 20.0\nhighcut = 200.0\nsample_rate = 1000\n")?;
    let env_out = dir.path().join("env.csv");
    let spec_out = dir.path().join("spec.csv");

    let mut cmd = cargo_bin_cmd!("envelope-scan");
    cmd.arg("--input")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--freq-limit")
        .arg("50")
        .arg("--envelope-out")
        .arg(&env_out)
        .arg("--spectrum-out")
        .arg(&spec_out);
    cmd.assert().success();

    let env_text = std::fs::read_to_string(&env_out)?;
    assert_eq!(env_text.lines().next(), Some("time_s,x,y,z"));
    assert_eq!(env_text.lines().count(), 2001);

    // 0.5 Hz bins from 0 to 50 Hz inclusive
    let spec_text = std::fs::read_to_string(&spec_out)?;
    assert_eq!(spec_text.lines().count(), 1 + 101);
    Ok(())
}

#[test]
fn inverted_band_exits_with_error() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_input(dir.path())?;

    let mut cmd = cargo_bin_cmd!("envelope-scan");
    cmd.arg("--input")
        .arg(&input)
        .arg("--lowcut")
        .arg("300")
        .arg("--highcut")
        .arg("100");
    cmd.assert().failure();
    Ok(())
}
