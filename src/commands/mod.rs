mod help;
mod loop_cmd;
mod nowplaying;
mod play;
mod queue;
mod remove;
mod skip;
mod stop;
mod volume;

use crate::{Data, Error};

pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        help::help(),
        play::play(),
        play::p(),
        skip::skip(),
        skip::s(),
        stop::stop(),
        stop::st(),
        queue::queue(),
        queue::q(),
        nowplaying::nowplaying(),
        nowplaying::np(),
        loop_cmd::loop_cmd(),
        loop_cmd::l(),
        remove::remove(),
        remove::rm(),
        volume::volume(),
        volume::v(),
    ]
}
