//! Interactive console for the reasoner

use std::io::{self, BufRead, Write};

use nars::NAR;

fn main() {
    println!("NARS - Non-Axiomatic Reasoning System");
    println!("=====================================");
    println!("Narsese sentences, a cycle count, 'reset', or 'exit'.");

    let mut nar = NAR::new();
    let stdin = io::stdin();
    loop {
        print!("nars> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => break,
            "reset" => {
                nar.reset();
                println!("memory cleared");
                continue;
            }
            _ => {}
        }
        match nar.input_narsese(line) {
            Ok(result) => {
                if let Some(task) = &result.task {
                    println!("in: {}", task);
                }
                if result.cycles > 0 {
                    println!("ran {} cycles (t = {})", result.cycles, nar.clock().now());
                }
                for answer in &result.answers {
                    println!("answer: {}", answer);
                }
                for key in &result.overflow {
                    println!("overflow: {}", key);
                }
            }
            Err(err) => println!("error: {}", err),
        }
    }
}
