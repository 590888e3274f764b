//! Terraform argument construction.
//!
//! These tests pin the exact argument vectors handed to the terraform
//! binary, including the property that variable files keep their order and
//! that backend pairs are passed through verbatim — an empty state key
//! included.

use std::path::PathBuf;

use proptest::prelude::*;
use tfcheck_cli::domain::config::BackendSettings;
use tfcheck_cli::domain::options::RunOptions;

fn options() -> RunOptions {
    RunOptions::new(
        PathBuf::from("/tmp/staged"),
        vec!["dev.tfvars".to_string()],
        BackendSettings::default().config_pairs("ci/redis.tfstate"),
    )
}

#[test]
fn init_args_carry_upgrade_and_backend_config() {
    let args = options().init_args();
    assert_eq!(args[0], "init");
    assert!(args.contains(&"-upgrade=true".to_string()));
    assert!(args.contains(&"-input=false".to_string()));
    assert!(args.contains(&"-no-color".to_string()));
    assert!(args.contains(&"-force-copy".to_string()));
    assert!(args.contains(&"-backend-config=bucket=adex-terraform-state".to_string()));
    assert!(args.contains(&"-backend-config=key=ci/redis.tfstate".to_string()));
    assert!(args.contains(&"-backend-config=region=us-east-1".to_string()));
    assert!(args.contains(&"-backend-config=dynamodb_table=adex-terraform-state".to_string()));
    assert!(args.contains(&"-backend-config=acl=bucket-owner-full-control".to_string()));
    assert!(args.contains(&"-backend-config=encrypt=true".to_string()));
}

#[test]
fn apply_args_are_non_interactive_and_locked() {
    let args = options().apply_args();
    assert_eq!(
        args,
        vec![
            "apply",
            "-input=false",
            "-auto-approve",
            "-no-color",
            "-lock=true",
            "-var-file=dev.tfvars",
        ]
    );
}

#[test]
fn destroy_args_mirror_apply_args() {
    let apply = options().apply_args();
    let destroy = options().destroy_args();
    assert_eq!(destroy[0], "destroy");
    assert_eq!(&destroy[1..], &apply[1..]);
}

#[test]
fn output_args_request_json() {
    assert_eq!(
        RunOptions::output_args("id"),
        vec!["output", "-no-color", "-json", "id"]
    );
}

#[test]
fn disabling_lock_is_reflected_in_args() {
    let mut opts = options();
    opts.lock = false;
    assert!(opts.apply_args().contains(&"-lock=false".to_string()));
    assert!(opts.destroy_args().contains(&"-lock=false".to_string()));
}

#[test]
fn empty_state_key_is_passed_through_unchanged() {
    // No local validation: the backend decides what an empty key means.
    let pairs = BackendSettings::default().config_pairs("");
    assert!(pairs.contains(&("key".to_string(), String::new())));

    let opts = RunOptions::new(PathBuf::from("/tmp/staged"), Vec::new(), pairs);
    assert!(
        opts.init_args()
            .contains(&"-backend-config=key=".to_string())
    );
}

proptest! {
    /// Every variable file appears as a `-var-file` flag, in the order given.
    #[test]
    fn var_files_keep_their_order(files in proptest::collection::vec("[a-z]{1,8}\\.tfvars", 0..5)) {
        let opts = RunOptions::new(PathBuf::from("/tmp/staged"), files.clone(), Vec::new());
        let args = opts.apply_args();
        let flags: Vec<String> = args
            .iter()
            .filter_map(|a| a.strip_prefix("-var-file=").map(str::to_string))
            .collect();
        prop_assert_eq!(flags, files);
    }

    /// Backend pairs come through as well-formed `-backend-config` flags.
    #[test]
    fn backend_pairs_are_well_formed(
        key in "[a-z_]{1,12}",
        value in "[a-zA-Z0-9/._-]{0,20}",
    ) {
        let opts = RunOptions::new(
            PathBuf::from("/tmp/staged"),
            Vec::new(),
            vec![(key.clone(), value.clone())],
        );
        let expected = format!("-backend-config={key}={value}");
        prop_assert!(opts.init_args().contains(&expected));
    }
}
