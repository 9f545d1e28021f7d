use std::{env, fs, process};

use anyhow::Context;
use log::info;

use continual_scenarios::{
    ClassLabel, DataLoader, InMemoryDataset, LabeledDataset, ScenarioConfig, TaskScenario,
    split_train_val,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (config_path, labels_path) = match parse_args(&args) {
        Ok(paths) => paths,
        Err(usage) => {
            eprintln!("{usage}");
            process::exit(1);
        }
    };

    if let Err(e) = run(config_path, labels_path) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Returns the config and labels paths, or the usage line.
fn parse_args(args: &[String]) -> Result<(&str, &str), String> {
    match args {
        [_, config, labels, ..] => Ok((config.as_str(), labels.as_str())),
        _ => {
            let program = args.first().map_or("continual-scenarios", String::as_str);
            Err(format!("Usage: {program} <config.json> <labels.json>"))
        }
    }
}

fn run(config_path: &str, labels_path: &str) -> anyhow::Result<()> {
    let raw = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config {config_path}"))?;
    let config = ScenarioConfig::from_json(&raw).context("failed to parse config")?;

    let raw = fs::read_to_string(labels_path)
        .with_context(|| format!("failed to read labels {labels_path}"))?;
    let ys: Vec<ClassLabel> = serde_json::from_str(&raw).context("labels must be a JSON array")?;
    info!("loaded {} label(s) from {labels_path}", ys.len());

    let xs: Vec<usize> = (0..ys.len()).collect();
    let dataset = InMemoryDataset::new(xs, ys)?;
    let scenario = TaskScenario::new(dataset, config.increment_spec())
        .context("failed to build scenario")?;

    let mut rng = config.rng();
    println!("{} task(s)", scenario.nb_tasks());

    for (task_id, view) in scenario.iter().enumerate() {
        let (train, val) = split_train_val(&view, config.val_split, &mut rng)?;
        let batches = DataLoader::new(&train, config.batch_size()).num_batches();

        println!(
            "task {task_id}: classes {:?}, {} sample(s), train {} ({batches} batch(es)), val {}",
            view.classes(),
            view.len(),
            train.len(),
            val.len(),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_args_takes_both_paths() {
        let args = args(&["bin", "config.json", "labels.json"]);
        assert_eq!(parse_args(&args), Ok(("config.json", "labels.json")));
    }

    #[test]
    fn parse_args_without_program_name_reports_usage() {
        let usage = parse_args(&[]).unwrap_err();
        assert_eq!(usage, "Usage: continual-scenarios <config.json> <labels.json>");

        let usage = parse_args(&args(&["bin", "config.json"])).unwrap_err();
        assert!(usage.starts_with("Usage: bin "));
    }
}
