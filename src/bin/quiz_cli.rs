use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use thiserror::Error;

use study_quiz::{
    config::{DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL, MAX_QUIZ_COUNT},
    credentials::{CredentialKind, CredentialStore, FileCredentialStore, StoreError},
    models::domain::{OptionLabel, QuizSet},
    services::gateway::{GatewayTarget, QuizGateway, ReqwestTransport},
    session::{AnswerFeedback, QuizSession, ReviewItem, SessionPhase},
};

#[derive(Parser)]
#[command(author, version, about = "Turn study notes into a multiple-choice quiz", long_about = None)]
#[command(after_help = "EXAMPLES:
    quiz-cli \"The sky is blue.\" --count 1
    quiz-cli --file notes.txt --count 5
    quiz-cli --file notes.txt --server http://localhost:3000")]
struct Args {
    /// Study text. Falls back to --file, then to typing it in.
    text: Option<String>,

    /// Read the study text from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Number of questions to request (1-20)
    #[arg(short = 'n', long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=MAX_QUIZ_COUNT as i64))]
    count: u32,

    /// Generate through a running study-quiz backend instead of calling Gemini directly
    #[arg(long)]
    server: Option<String>,

    /// Gemini model for direct calls
    #[arg(long, default_value = DEFAULT_GEMINI_MODEL)]
    model: String,

    /// Gemini API base URL for direct calls
    #[arg(long, default_value = DEFAULT_GEMINI_API_BASE)]
    api_base: String,

    /// Credential file [default: ~/.study-quiz/credentials.json]
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Store a bearer token sent with every generation request
    #[arg(long)]
    token: Option<String>,

    /// Forget the stored API key and bearer token before starting
    #[arg(long)]
    reset_credentials: bool,

    /// Seconds to wait for a generation before giving up
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One line of user input while a quiz is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Answer(OptionLabel),
    Next,
    Restart,
    Review,
    NewQuiz,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        match input.as_str() {
            "n" | "next" | "" => Ok(Command::Next),
            "r" | "restart" => Ok(Command::Restart),
            "v" | "review" => Ok(Command::Review),
            "new" => Ok(Command::NewQuiz),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => other
                .parse::<OptionLabel>()
                .map(Command::Answer)
                .map_err(|_| format!("Unknown command '{}'", s.trim())),
        }
    }
}

/// Whether the quiz loop ended by asking for a new quiz or by quitting.
enum Outcome {
    NewQuiz,
    Quit,
}

struct Terminal<R> {
    input: R,
}

impl<R: BufRead> Terminal<R> {
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn confirm(&mut self, label: &str) -> io::Result<bool> {
        Ok(self
            .prompt(label)?
            .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
    }

    /// Reads lines until an empty one; `None` on end of input.
    fn read_block(&mut self, label: &str) -> io::Result<Option<String>> {
        println!("{}", label);
        let mut lines = Vec::new();
        loop {
            match self.prompt("")? {
                Some(line) if line.trim().is_empty() => break,
                Some(line) => lines.push(line),
                None if lines.is_empty() => return Ok(None),
                None => break,
            }
        }
        Ok(Some(lines.join("\n")))
    }
}

struct App<R> {
    terminal: Terminal<R>,
    gateway: QuizGateway,
    store: Arc<dyn CredentialStore>,
    needs_api_key: bool,
}

impl<R: BufRead> App<R> {
    fn ensure_api_key(&mut self) -> Result<(), CliError> {
        if !self.needs_api_key || self.store.get(CredentialKind::ApiKey).is_some() {
            return Ok(());
        }
        if let Some(key) = self.terminal.prompt("Enter your Gemini API key: ")? {
            self.store.set(CredentialKind::ApiKey, &key)?;
        }
        Ok(())
    }

    fn reset_credentials(&mut self) -> Result<(), CliError> {
        self.store.clear(CredentialKind::ApiKey)?;
        self.store.clear(CredentialKind::BearerToken)?;
        if let Some(token) = self
            .terminal
            .prompt("Bearer token (leave empty for none): ")?
        {
            self.store.set(CredentialKind::BearerToken, &token)?;
        }
        self.ensure_api_key()
    }

    /// One generation, plus a single re-issue after a user-confirmed
    /// credential reset. Failures are printed and yield `None`.
    async fn generate(&mut self, study_text: &str, count: u32) -> Result<Option<QuizSet>, CliError> {
        self.ensure_api_key()?;
        println!("Generating {} questions...", count);

        let mut result = self
            .gateway
            .generate(study_text, count, self.store.as_ref())
            .await;

        if let Err(e) = &result {
            if e.is_auth_failure() {
                println!("{}", e.user_message());
                if self
                    .terminal
                    .confirm("Reset the stored credentials and try again? [y/N] ")?
                {
                    self.reset_credentials()?;
                    result = self
                        .gateway
                        .generate(study_text, count, self.store.as_ref())
                        .await;
                } else {
                    return Ok(None);
                }
            }
        }

        match result {
            Ok(quiz_set) => {
                match self.store.record_generation() {
                    Ok(total) => log::info!("Generation #{} succeeded", total),
                    Err(e) => log::warn!("Could not record generation count: {}", e),
                }
                Ok(Some(quiz_set))
            }
            Err(e) => {
                println!("{}", e.user_message());
                Ok(None)
            }
        }
    }

    fn play(&mut self, session: &mut QuizSession) -> Result<Outcome, CliError> {
        loop {
            let hint = match session.phase() {
                SessionPhase::Idle => return Ok(Outcome::NewQuiz),
                SessionPhase::AwaitingSelection => {
                    if let Some(view) = session.current_question() {
                        println!();
                        println!("Question {}/{} (score {})", view.number, view.total, view.score);
                        println!("{}", view.question);
                        for option in &view.options {
                            println!("  {}) {}", option.label, option.text);
                        }
                    }
                    "Answer [A-D], [r]estart, [q]uit: "
                }
                SessionPhase::Answered => "[n]ext, [r]estart, [q]uit: ",
                SessionPhase::Finished => {
                    if let Some(summary) = session.result_summary() {
                        println!();
                        println!(
                            "Final score: {}/{} ({:.0}%)",
                            summary.score, summary.total, summary.percentage
                        );
                        println!("{}", summary.band.message());
                    }
                    "[v]review, [r]estart, [new] quiz, [q]uit: "
                }
            };

            let line = match self.terminal.prompt(hint)? {
                Some(line) => line,
                None => return Ok(Outcome::Quit),
            };
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };

            match command {
                Command::Answer(label) => {
                    if session.select(label) {
                        if let Some(feedback) = session.submit() {
                            print_feedback(&feedback);
                        }
                    } else {
                        println!("This question is already answered.");
                    }
                }
                Command::Next => {
                    if !session.advance() && session.phase() == SessionPhase::AwaitingSelection {
                        println!("Choose an answer first.");
                    }
                }
                Command::Restart => {
                    session.restart();
                }
                Command::Review => match session.review() {
                    Some(items) => print_review(&items),
                    None => println!("The review is available once the quiz is finished."),
                },
                Command::NewQuiz => {
                    if session.return_to_input() {
                        return Ok(Outcome::NewQuiz);
                    }
                    println!("Finish the quiz first, or [r]estart it.");
                }
                Command::Quit => return Ok(Outcome::Quit),
            }
        }
    }
}

fn print_feedback(feedback: &AnswerFeedback) {
    println!();
    if feedback.is_correct {
        println!("Correct!");
    } else {
        println!("Incorrect. The answer is {}.", feedback.correct_label);
    }
    println!("{}", feedback.explanation);
    for option in &feedback.option_explanations {
        let marker = if option.is_correct {
            "+"
        } else if option.was_wrong_choice {
            "x"
        } else {
            " "
        };
        match &option.explanation {
            Some(text) => println!(" {} {}) {}", marker, option.label, text),
            None => println!(" {} {}) {}", marker, option.label, option.text),
        }
    }
}

fn print_review(items: &[ReviewItem]) {
    for item in items {
        println!();
        println!(
            "{}. {} [{}]",
            item.number,
            item.question,
            if item.is_correct { "correct" } else { "wrong" }
        );
        println!(
            "   Your answer: {}",
            item.chosen_text.as_deref().unwrap_or("(none)")
        );
        println!("   Correct answer: {}", item.correct_text);
        println!("   {}", item.explanation);
    }
}

fn initial_text(args: &Args) -> io::Result<Option<String>> {
    if let Some(text) = &args.text {
        return Ok(Some(text.clone()));
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path).map(Some);
    }
    Ok(None)
}

async fn run(args: Args) -> Result<(), CliError> {
    let path = args
        .credentials
        .clone()
        .unwrap_or_else(FileCredentialStore::default_path);
    let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::open(path)?);

    if args.reset_credentials {
        store.clear(CredentialKind::ApiKey)?;
        store.clear(CredentialKind::BearerToken)?;
    }
    if let Some(token) = &args.token {
        store.set(CredentialKind::BearerToken, token)?;
    }

    let (target, needs_api_key) = match &args.server {
        Some(base_url) => (
            GatewayTarget::Backend {
                base_url: base_url.clone(),
            },
            false,
        ),
        None => (
            GatewayTarget::Provider {
                base_url: args.api_base.clone(),
                model: args.model.clone(),
            },
            true,
        ),
    };
    let gateway = QuizGateway::new(Arc::new(ReqwestTransport::new()), target)
        .with_timeout(Duration::from_secs(args.timeout_secs.max(1)));

    let stdin = io::stdin();
    let mut app = App {
        terminal: Terminal { input: stdin.lock() },
        gateway,
        store,
        needs_api_key,
    };

    let mut study_text = initial_text(&args)?;
    let mut count = args.count;
    let mut session = QuizSession::new();

    loop {
        let text = match study_text.take() {
            Some(text) if !text.trim().is_empty() => text,
            _ => match app
                .terminal
                .read_block("Paste your study text, then an empty line:")?
            {
                Some(text) => text,
                None => return Ok(()),
            },
        };

        let quiz_set = match app.generate(&text, count).await? {
            Some(quiz_set) => quiz_set,
            None => {
                if app.terminal.confirm("Retry with the same text? [y/N] ")? {
                    study_text = Some(text);
                }
                continue;
            }
        };

        if let Err(e) = session.seed(quiz_set) {
            println!("{}", e.user_message());
            continue;
        }

        match app.play(&mut session)? {
            Outcome::Quit => return Ok(()),
            Outcome::NewQuiz => {
                if app
                    .terminal
                    .confirm("Reuse the previous study text? [y/N] ")?
                {
                    study_text = Some(text);
                }
                if let Some(answer) = app
                    .terminal
                    .prompt(&format!("Number of questions [{}]: ", count))?
                {
                    if let Ok(n) = answer.trim().parse::<u32>() {
                        count = n.clamp(1, MAX_QUIZ_COUNT);
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
