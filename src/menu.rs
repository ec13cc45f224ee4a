use std::{
    io::{stdin, stdout, Write as _},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use anyhow::{bail, Context};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::{error, info};

use crate::settings::Settings;

struct Text {
    note: &'static str,
    menu: &'static str,
    prompt_density: &'static str,
    prompt_speed: &'static str,
    prompt_fade: &'static str,
    prompt_radius: &'static str,
    rejected: &'static str,
    press_any_key: &'static str,
}

const EN: Text = Text {
    note: "It may work unstably in fullscreen applications.\n\
        Before launching games in fullscreen resolution, it is recommended \
        to turn off the snowflakes.\n\
        Try turning them on after launching the game, preferably after \
        opening the game window.",
    menu: "1 - Enable/Disable snowflakes\n\
        2 - Configure the number of snowflakes\n\
        3 - Configure the falling speed of snowflakes\n\
        4 - Configure the disappearance speed of snowflakes\n\
        5 - Configure the maximum radius of snowflakes",
    prompt_density: "Configure the number of snowflakes\n\
        Enter a number between 1 and 30 (lower number - more snowflakes): ",
    prompt_speed: "Configure the falling speed of snowflakes\n\
        Enter a number between 1 and 100 (default is 10): ",
    prompt_fade: "Configure the disappearance speed of snowflakes\n\
        Enter a number between 1 and 10 (default is 2): ",
    prompt_radius: "Configure the maximum radius of snowflakes\n\
        Enter a number between 1 and 10 (default is 3): ",
    rejected: "Invalid number range entered",
    press_any_key: "Press any key to return to the main menu",
};

const RU: Text = Text {
    note: "Может работать нестабильно в полноэкранных приложениях.\n\
        Перед запуском игр в полноэкранном разрешении, рекомендуется \
        выключить снежинки.\n\
        Попробуйте включить их после запуска игры, желательно открыв окно \
        игры.",
    menu: "1 - Включить/Выключить снежинки\n\
        2 - Настроить количество снежинок\n\
        3 - Настроить скорость падения снежинок\n\
        4 - Настроить скорость исчезновения снежинок\n\
        5 - Настроить максимальный радиус снежинок",
    prompt_density: "Настроить количество снежинок\n\
        Введите число от 1 до 30 (меньше число - больше снежинок): ",
    prompt_speed: "Настроить скорость падения снежинок\n\
        Введите число от 1 до 100 (по умолчанию 10): ",
    prompt_fade: "Настроить скорость исчезновения снежинок\n\
        Введите число от 1 до 10 (по умолчанию 2): ",
    prompt_radius: "Настроить максимальный радиус снежинок\n\
        Введите число от 1 до 10 (по умолчанию 3): ",
    rejected: "Введён неверный диапазон чисел",
    press_any_key: "Чтобы вернуться в главное меню, нажмите любую клавишу",
};

/// Runs the console menu until the terminal goes away, then raises the
/// shutdown flag so the render loop can exit too.
pub fn run(settings: &Mutex<Settings>, shutdown: &AtomicBool) {
    if let Err(err) = menu_loop(settings) {
        error!("menu stopped: {err:#}");
    }
    shutdown.store(true, Ordering::Relaxed);
}

fn menu_loop(settings: &Mutex<Settings>) -> anyhow::Result<()> {
    println!("Select language\n1 - EN\n2 - RU");
    let text = loop {
        match read_key().context("failed to read language choice")? {
            '1' => break &EN,
            '2' => break &RU,
            _ => {}
        }
    };

    println!("{}", text.note);

    loop {
        println!("\n{}", text.menu);
        match read_key().context("failed to read menu choice")? {
            '1' => {
                let mut settings = settings.lock().unwrap();
                settings.active = !settings.active;
                info!("active: {}", settings.active);
            }
            '2' => prompt_number(
                text,
                text.prompt_density,
                settings,
                Settings::set_density,
            )?,
            '3' => prompt_number(
                text,
                text.prompt_speed,
                settings,
                Settings::set_speed,
            )?,
            '4' => prompt_number(
                text,
                text.prompt_fade,
                settings,
                Settings::set_fade,
            )?,
            '5' => prompt_number(
                text,
                text.prompt_radius,
                settings,
                Settings::set_max_radius,
            )?,
            _ => {}
        }
    }
}

/// Reads one number and applies it; invalid or out-of-range input leaves the
/// settings untouched.
fn prompt_number(
    text: &Text,
    prompt: &str,
    settings: &Mutex<Settings>,
    apply: fn(&mut Settings, u32) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    print!("{prompt}");
    stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = stdin()
        .read_line(&mut line)
        .context("failed to read number")?;
    if read == 0 {
        bail!("stdin closed");
    }

    let accepted = match line.trim().parse::<u32>() {
        Ok(value) => {
            let mut settings = settings.lock().unwrap();
            match apply(&mut settings, value) {
                Ok(()) => {
                    info!("settings updated: {:?}", *settings);
                    true
                }
                Err(_) => false,
            }
        }
        Err(_) => false,
    };

    if !accepted {
        println!("{}", text.rejected);
        println!("{}", text.press_any_key);
        read_key().context("failed to read key")?;
    }

    Ok(())
}

/// Blocks for a single keystroke; raw mode only while waiting so numeric
/// entry stays line-based.
fn read_key() -> anyhow::Result<char> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let key = wait_for_key();
    disable_raw_mode().context("failed to disable raw mode")?;
    key
}

fn wait_for_key() -> anyhow::Result<char> {
    loop {
        let event = event::read().context("failed to read console event")?;
        let Event::Key(key) = event else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && key.code == KeyCode::Char('c')
        {
            bail!("interrupted");
        }
        if let KeyCode::Char(char) = key.code {
            return Ok(char);
        }
    }
}
