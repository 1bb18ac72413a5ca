//! Interactive terminal front end.
//!
//! Each input line is one user action: a navigation, a field edit, a button
//! press. After every action the current page is rendered again.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::app::{App, Page};
use crate::client::{ApiError, Recipe, RecipeApi, RecipeId};
use crate::pages::{CategoryFilter, Field, PendingSave, SubmitOutcome};
use crate::router::Route;

const LOADING_NOTICE: &str = "Still loading, please wait.";
const SAVING_NOTICE: &str = "Still saving, please wait.";
const DELETING_NOTICE: &str = "Still deleting, please wait.";

pub const HELP: &str = "\
Navigation:
  go <route>            open a route (/, /add-recipe, /recipe/<id>, /edit-recipe/<id>)
  home | new            recipe list | add a recipe
  open <id>             recipe details
  edit <id>             edit a recipe
Recipe list:
  search <text>         filter by title (empty clears)
  category <name|all>   filter by category
Recipe details:
  edit | delete         edit or delete this recipe (delete asks to confirm)
  yes | no              answer the delete prompt
Recipe form:
  title <text>          set the title
  instructions <text>   set the instructions (\\n for a line break)
  add | remove <n>      add an ingredient | remove ingredient n
  name <n> <text>       set ingredient n's name
  qty <n> <text>        set ingredient n's quantity
  submit | cancel       save | discard and go back to the list
Other:
  show | help | quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(Route),
    Show,
    Help,
    Quit,
    Search(String),
    Category(CategoryFilter),
    Edit,
    Delete,
    Answer(bool),
    Title(String),
    Instructions(String),
    AddIngredient,
    RemoveIngredient(usize),
    IngredientName(usize, String),
    IngredientQuantity(usize, String),
    Submit,
}

impl Command {
    /// Parses one input line. Ingredient numbers are 1-based on input and
    /// 0-based in the returned command.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "go" => Command::Go(rest.parse().map_err(|e| format!("{}", e))?),
            "home" | "cancel" => Command::Go(Route::List),
            "new" => Command::Go(Route::Create),
            "open" => Command::Go(Route::Detail(parse_id(rest)?)),
            "edit" if rest.is_empty() => Command::Edit,
            "edit" => Command::Go(Route::Edit(parse_id(rest)?)),
            "show" | "" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "search" => Command::Search(rest.to_string()),
            "category" => Command::Category(CategoryFilter::parse(rest)),
            "delete" => Command::Delete,
            "yes" | "y" => Command::Answer(true),
            "no" | "n" => Command::Answer(false),
            "title" => Command::Title(rest.to_string()),
            "instructions" => Command::Instructions(rest.replace("\\n", "\n")),
            "add" => Command::AddIngredient,
            "remove" => Command::RemoveIngredient(parse_position(rest)?),
            "name" => {
                let (n, text) = split_position(rest)?;
                Command::IngredientName(n, text)
            }
            "qty" | "quantity" => {
                let (n, text) = split_position(rest)?;
                Command::IngredientQuantity(n, text)
            }
            "submit" | "save" => Command::Submit,
            other => return Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        };
        Ok(command)
    }

    /// Commands that leave the current page.
    pub fn leaves_page(&self) -> bool {
        matches!(self, Command::Go(_) | Command::Quit)
    }
}

fn parse_id(raw: &str) -> Result<RecipeId, String> {
    raw.parse()
        .map_err(|_| format!("'{}' is not a recipe id", raw))
}

fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{}' is not an ingredient number (they start at 1)", raw)),
        Ok(n) => Ok(n - 1),
    }
}

fn split_position(rest: &str) -> Result<(usize, String), String> {
    let (n, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((parse_position(n)?, text.trim().to_string()))
}

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// The form passed validation; this save is now in flight.
    Save(PendingSave),
    /// The user confirmed deleting this recipe.
    Delete(RecipeId),
}

/// Applies one command to the app and returns any feedback to print before
/// the page is rendered again.
///
/// Commands that need the backend come back as [`Flow::Save`] or
/// [`Flow::Delete`] for the caller to send and finish with [`finish_request`].
pub fn execute<A: RecipeApi>(app: &mut App<A>, command: Command) -> (Flow, String) {
    let mut feedback = String::new();
    let unavailable = |name: &str| format!("'{}' is not available on this page.", name);

    match command {
        Command::Quit => return (Flow::Quit, feedback),
        Command::Help => feedback.push_str(HELP),
        Command::Show => {}
        Command::Go(route) => app.navigate(route),
        Command::Search(text) => match app.page_mut() {
            Page::List(page) => page.set_search(text),
            _ => feedback = unavailable("search"),
        },
        Command::Category(filter) => match app.page_mut() {
            Page::List(page) => page.set_category(filter),
            _ => feedback = unavailable("category"),
        },
        Command::Edit => {
            let route = match app.page() {
                Page::Detail(page) if page.recipe().is_some() => Some(page.edit_route()),
                _ => None,
            };
            match route {
                Some(route) => app.navigate(route),
                None => feedback = unavailable("edit"),
            }
        }
        Command::Delete => match app.page_mut() {
            Page::Detail(page) => {
                if page.request_delete().is_none() {
                    feedback = "There is no recipe to delete.".to_string();
                }
            }
            _ => feedback = unavailable("delete"),
        },
        Command::Answer(confirmed) => match app.page_mut() {
            Page::Detail(page) if page.is_confirming_delete() => {
                if !confirmed {
                    page.cancel_delete();
                } else if let Some(id) = page.begin_delete() {
                    return (Flow::Delete(id), feedback);
                }
            }
            _ => feedback = "Nothing to confirm.".to_string(),
        },
        Command::Title(text) => feedback = edit_field(app, Field::Title, text),
        Command::Instructions(text) => feedback = edit_field(app, Field::Instructions, text),
        Command::IngredientName(n, text) => feedback = edit_field(app, Field::IngredientName(n), text),
        Command::IngredientQuantity(n, text) => {
            feedback = edit_field(app, Field::IngredientQuantity(n), text)
        }
        Command::AddIngredient => match app.page_mut() {
            Page::Form(form) => {
                if !form.add_ingredient() {
                    feedback = "The form is not editable right now.".to_string();
                }
            }
            _ => feedback = unavailable("add"),
        },
        Command::RemoveIngredient(n) => match app.page_mut() {
            Page::Form(form) => {
                if !form.remove_ingredient(n) {
                    feedback = "That ingredient cannot be removed.".to_string();
                }
            }
            _ => feedback = unavailable("remove"),
        },
        Command::Submit => match app.page_mut() {
            Page::Form(form) => match form.begin_submit() {
                Ok(save) => return (Flow::Save(save), feedback),
                Err(SubmitOutcome::Ignored) => feedback = "The form is busy.".to_string(),
                Err(_) => {}
            },
            _ => feedback = unavailable("submit"),
        },
    }
    (Flow::Continue, feedback)
}

/// Response to a request started by [`execute`].
#[derive(Debug)]
pub enum Finished {
    Saved(Result<Recipe, ApiError>),
    Deleted(Result<(), ApiError>),
}

/// Hands a finished save or delete to the page that started it, navigating
/// on success. Returns feedback for the user.
pub fn finish_request<A: RecipeApi>(app: &mut App<A>, finished: Finished) -> String {
    let next = match (app.page_mut(), finished) {
        (Page::Form(form), Finished::Saved(result)) => match form.finish_submit(result) {
            SubmitOutcome::Saved(recipe) => Some((Route::List, format!("Saved '{}'.", recipe.title))),
            _ => None,
        },
        (Page::Detail(page), Finished::Deleted(result)) => {
            page.finish_delete(result).map(|route| (route, String::new()))
        }
        (_, finished) => {
            tracing::debug!("Discarding result for a page no longer shown: {:?}", finished);
            None
        }
    };

    match next {
        Some((route, feedback)) => {
            app.navigate(route);
            feedback
        }
        None => String::new(),
    }
}

fn edit_field<A: RecipeApi>(app: &mut App<A>, field: Field, value: String) -> String {
    match app.page_mut() {
        Page::Form(form) => {
            if form.update_field(field, value) {
                String::new()
            } else {
                "That field cannot be changed right now.".to_string()
            }
        }
        _ => "Fields can only be edited on the recipe form.".to_string(),
    }
}

enum Waited<T> {
    Done(T),
    Interrupted(Command),
    Closed,
}

impl<T> Waited<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Waited<U> {
        match self {
            Waited::Done(value) => Waited::Done(f(value)),
            Waited::Interrupted(command) => Waited::Interrupted(command),
            Waited::Closed => Waited::Closed,
        }
    }
}

/// Waits for `work` while still reading input.
///
/// A command that leaves the page drops `work` and is handed back; anything
/// else is answered with `notice`.
async fn wait_for<T, F, R, W>(
    work: F,
    lines: &mut Lines<R>,
    output: &mut W,
    notice: &str,
) -> anyhow::Result<Waited<T>>
where
    F: Future<Output = T>,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tokio::pin!(work);
    loop {
        tokio::select! {
            biased;
            done = &mut work => return Ok(Waited::Done(done)),
            line = lines.next_line() => match line? {
                None => return Ok(Waited::Closed),
                Some(line) => match Command::parse(&line) {
                    Ok(command) if command.leaves_page() => {
                        return Ok(Waited::Interrupted(command))
                    }
                    Ok(_) => write_line(output, notice).await?,
                    Err(message) => write_line(output, &message).await?,
                },
            },
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> anyhow::Result<()> {
    output.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        output.write_all(b"\n").await?;
    }
    Ok(())
}

/// Runs the command loop until `quit` or end of input.
///
/// While a page is loading, or a save or delete is in flight, input is still
/// read: a navigation drops the request, anything else is answered with a
/// wait notice.
pub async fn run<A, R, W>(app: &mut App<A>, input: R, output: &mut W) -> anyhow::Result<()>
where
    A: RecipeApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut queued: Option<Command> = None;

    loop {
        if queued.is_none() {
            let loading = match app.pending_fetch() {
                None => None,
                Some(fetch) => {
                    output.write_all(app.render().as_bytes()).await?;
                    output.flush().await?;
                    Some(wait_for(fetch, &mut lines, output, LOADING_NOTICE).await?)
                }
            };

            match loading {
                Some(Waited::Done(fetched)) => app.deliver(fetched),
                Some(Waited::Interrupted(command)) => {
                    tracing::debug!("Abandoning load of {}", app.route());
                    queued = Some(command);
                }
                Some(Waited::Closed) => return Ok(()),
                None => {}
            }
        }

        let command = match queued.take() {
            Some(command) => command,
            None => {
                output.write_all(app.render().as_bytes()).await?;
                output.write_all(b"> ").await?;
                output.flush().await?;
                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                match Command::parse(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        write_line(output, &message).await?;
                        continue;
                    }
                }
            }
        };

        let (flow, feedback) = execute(app, command);
        if !feedback.is_empty() {
            write_line(output, &feedback).await?;
        }

        let waited = match flow {
            Flow::Continue => continue,
            Flow::Quit => {
                output.flush().await?;
                return Ok(());
            }
            Flow::Save(save) => {
                output.write_all(app.render().as_bytes()).await?;
                output.flush().await?;
                wait_for(save.send(app.api()), &mut lines, output, SAVING_NOTICE)
                    .await?
                    .map(Finished::Saved)
            }
            Flow::Delete(id) => {
                output.write_all(app.render().as_bytes()).await?;
                output.flush().await?;
                wait_for(app.api().delete(id), &mut lines, output, DELETING_NOTICE)
                    .await?
                    .map(Finished::Deleted)
            }
        };

        match waited {
            Waited::Done(finished) => {
                let feedback = finish_request(app, finished);
                if !feedback.is_empty() {
                    write_line(output, &feedback).await?;
                }
            }
            Waited::Interrupted(command) => {
                tracing::debug!("Abandoning request on {}", app.route());
                queued = Some(command);
            }
            Waited::Closed => return Ok(()),
        }
    }
}
