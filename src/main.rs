//! # Job Processor - Demo
//! src/main.rs
//!
//! Ejercita la ABI C igual que lo haría el programa C: suma simple,
//! encolado de N jobs, poll de cada resultado y liberación del processor.

use job_processor::config::Config;
use job_processor::jobs::ProcessorStats;
use job_processor::{
    do_add, logging, processor_create_with_capacity, processor_enque_add, processor_free,
    processor_poll_result, processor_stats, Job, ProcessingStatus, ProcessorHandle,
};
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Reintentos de un enqueue rechazado por cola llena
const ENQUEUE_RETRIES: u32 = 50;
const ENQUEUE_BACKOFF_MS: u64 = 2;

/// Resultado de un poll individual para el reporte
#[derive(Debug, Serialize)]
struct PollReport {
    index: u32,
    job: Job,
    status: ProcessingStatus,
    value: Option<i32>,
    expected: i32,
}

#[derive(Debug, Serialize)]
struct DemoReport {
    do_add: u32,
    enqueued: Vec<ProcessingStatus>,
    polls: Vec<PollReport>,
    stats: Option<ProcessorStats>,
}

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    logging::init(&config.log_level);

    if !config.json {
        config.print_summary();
    }

    let report = run(&config);

    let mismatches = report
        .polls
        .iter()
        .filter(|poll| poll.value != Some(poll.expected))
        .count();

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("💥 Error serializando reporte: {}", e),
        }
    }

    if mismatches > 0 {
        warn!(mismatches, "some results did not match");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> DemoReport {
    let (a, b) = (7, 5);
    let sum = do_add(a, b);
    if !config.json {
        println!("Adding {} + {} result = {}", a, b, sum);
    }

    // validate() garantiza que la capacidad entra en u32
    let processor = processor_create_with_capacity(config.queue_capacity as u32);
    info!(handle = processor, jobs = config.jobs, "enqueueing jobs");

    let enqueued: Vec<ProcessingStatus> = (0..config.jobs)
        .map(|i| enqueue_with_retry(processor, Job::add(1, i as i32 + 10)))
        .collect();

    let mut polls = Vec::with_capacity(config.jobs as usize);
    for i in 0..config.jobs {
        let expected = 1 + i as i32 + 10;
        let mut value = 0;

        // SAFETY: `value` es un i32 local escribible
        let status =
            unsafe { processor_poll_result(processor, &mut value, config.poll_timeout_ms) };

        if status == ProcessingStatus::Ok {
            if !config.json {
                println!(
                    "Got {} result! Is result {} == {} expected? {}",
                    i,
                    value,
                    expected,
                    value == expected
                );
            }
        } else if !config.json {
            println!("Getting {} result failed, reason = {:?}.", i, status);
        }

        polls.push(PollReport {
            index: i,
            job: Job::add(1, i as i32 + 10),
            status,
            value: status.is_ok().then_some(value),
            expected,
        });
    }

    let stats = match processor_stats(processor) {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!(error = %e, "could not read processor stats");
            None
        }
    };

    // Síncrono: al volver el worker ya terminó
    processor_free(processor);
    info!(handle = processor, "processor freed");

    DemoReport {
        do_add: sum,
        enqueued,
        polls,
        stats,
    }
}

/// Encola un Add reintentando con backoff mientras el estado sea reintentable
fn enqueue_with_retry(processor: ProcessorHandle, job: Job) -> ProcessingStatus {
    let mut status = processor_enque_add(processor, job.left(), job.right());

    for _ in 0..ENQUEUE_RETRIES {
        if !status.is_retryable() {
            break;
        }
        thread::sleep(Duration::from_millis(ENQUEUE_BACKOFF_MS));
        status = processor_enque_add(processor, job.left(), job.right());
    }

    status
}
