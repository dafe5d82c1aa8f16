// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Signalbox CLI entrypoint.
//!
//! Loads a topology (or the bundled demo), applies any `--advance` / `--toggle` /
//! `--route` commands in order as one batch, and prints either the status board or the
//! render graph as JSON.

use std::error::Error;
use std::path::Path;

use signalbox::layout::LayoutTable;
use signalbox::model::{EdgeId, NodeId, Route, TrainId};
use signalbox::ops::{apply_ops, Op};
use signalbox::render::{render_graph_schema, render_status, to_render_graph};

const LOG_ENV: &str = "SIGNALBOX_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<topology.json>] [--layout <file>] [--json] [<command>...]\n  {program} --demo [--json] [<command>...]\n  {program} --schema\n\nCommands (applied in order, as one batch):\n  --advance <train> <edge>            move <train> from <edge> onto the next routed edge\n  --toggle <edge>                     manual occupancy override\n  --route <switch> <straight|diverging>\n\n--json prints the render graph instead of the status board.\n--demo uses the bundled two-station diagram and its layout.\nSet {LOG_ENV} (e.g. {LOG_ENV}=debug) to control logging."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Advance { train: String, edge: String },
    Toggle { edge: String },
    Route { switch: String, route: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    json: bool,
    schema: bool,
    topology: Option<String>,
    layout: Option<String>,
    commands: Vec<Command>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--json" => {
                if options.json {
                    return Err(());
                }
                options.json = true;
            }
            "--schema" => {
                if options.schema {
                    return Err(());
                }
                options.schema = true;
            }
            "--layout" => {
                if options.layout.is_some() {
                    return Err(());
                }
                options.layout = Some(args.next().ok_or(())?);
            }
            "--advance" => {
                let train = args.next().ok_or(())?;
                let edge = args.next().ok_or(())?;
                options.commands.push(Command::Advance { train, edge });
            }
            "--toggle" => {
                let edge = args.next().ok_or(())?;
                options.commands.push(Command::Toggle { edge });
            }
            "--route" => {
                let switch = args.next().ok_or(())?;
                let route = args.next().ok_or(())?;
                options.commands.push(Command::Route { switch, route });
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.topology.is_some() {
                    return Err(());
                }
                options.topology = Some(arg);
            }
        }
    }

    if options.demo && (options.topology.is_some() || options.layout.is_some()) {
        return Err(());
    }

    if options.schema
        && (options.demo
            || options.json
            || options.topology.is_some()
            || options.layout.is_some()
            || !options.commands.is_empty())
    {
        return Err(());
    }

    if !options.schema && !options.demo && options.topology.is_none() {
        return Err(());
    }

    Ok(options)
}

fn command_op(command: &Command) -> Result<Op, Box<dyn Error>> {
    let op = match command {
        Command::Advance { train, edge } => Op::Advance {
            train_id: TrainId::new(train.as_str())?,
            from_edge_id: EdgeId::new(edge.as_str())?,
        },
        Command::Toggle { edge } => Op::ToggleOccupancy {
            edge_id: EdgeId::new(edge.as_str())?,
        },
        Command::Route { switch, route } => Op::SetRoute {
            switch_id: NodeId::new(switch.as_str())?,
            route: route.parse::<Route>()?,
        },
    };
    Ok(op)
}

fn init_logging() {
    let env = env_logger::Env::new().filter_or(LOG_ENV, "warn");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "signalbox".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging();

        if options.schema {
            println!("{}", serde_json::to_string_pretty(&render_graph_schema())?);
            return Ok(());
        }

        let (mut network, layout) = if options.demo {
            (
                signalbox::demo::demo_network()?,
                Some(signalbox::demo::demo_layout()?),
            )
        } else {
            let topology = options.topology.as_deref().unwrap_or_default();
            let network = signalbox::format::load_topology_file(Path::new(topology))?;
            let layout = options
                .layout
                .as_deref()
                .map(|path| LayoutTable::load_file(Path::new(path)))
                .transpose()?;
            (network, layout)
        };

        let ops = options
            .commands
            .iter()
            .map(command_op)
            .collect::<Result<Vec<_>, _>>()?;
        let base_rev = network.rev();
        apply_ops(&mut network, base_rev, &ops)?;

        if options.json {
            let graph = to_render_graph(&network, layout.as_ref());
            println!("{}", serde_json::to_string_pretty(&graph)?);
        } else {
            print!("{}", render_status(&network));
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("signalbox: {err}");
        std::process::exit(1);
    }
}
