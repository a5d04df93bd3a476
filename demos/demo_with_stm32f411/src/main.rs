//! Drive an HD44780 (LCD1602) with a STM32F411RET6 in 4 Pin Mode
//!
//! this demo walks through every instruction of the driver once

//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!     Vss <-> GND
//!     Vdd <-> 5V (It is best to use an external source for the 5V pin, such as the 5V output from a DAPLink device or USB.)
//!      V0 <-> potentiometer <-> 5V & GND (to adjust the display contrast)
//!      RS <-> PA0
//!      RW <-> PA1
//!      EN <-> PA2 (and optionally connect to a 4.7 kOhm Pulldown resistor, to stable voltage level when STM32 reset)
//!      D4 <-> PA3
//!      D5 <-> PA4
//!      D6 <-> PA5
//!      D7 <-> PA6
//!       A <-> 5V
//!       K <-> GND

#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*};

use hd44780_gpio::{
    command::{AddressDirection, Font, LineMode, MoveDirection, ShiftType, State},
    lcd::{Config, Lcd},
    pins::OpenDrain,
    sender::{ParallelSender, PinSet, PollPolicy},
};

// a heart shape, the 8 rows of CGRAM character 1
const HEART: [u8; 8] = [
    0b00000, 0b00000, 0b01010, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
];

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    // init needed digital pins

    let gpioa = dp.GPIOA.split();

    // Push-pull mode for a fast interaction
    let rs_pin = gpioa.pa0.into_push_pull_output().erase();
    let rw_pin = gpioa.pa1.into_push_pull_output().erase();
    let en_pin = gpioa.pa2.into_push_pull_output().erase();

    // Open drain with pull up, so the LCD can drive data lines when we read from it
    let db4_pin = gpioa.pa3.into_open_drain_output().internal_pull_up(true).erase();
    let db5_pin = gpioa.pa4.into_open_drain_output().internal_pull_up(true).erase();
    let db6_pin = gpioa.pa5.into_open_drain_output().internal_pull_up(true).erase();
    let db7_pin = gpioa.pa6.into_open_drain_output().internal_pull_up(true).erase();

    // put pins together
    let pins = PinSet::four_line(
        rs_pin,
        rw_pin,
        en_pin,
        OpenDrain::new(db4_pin),
        OpenDrain::new(db5_pin),
        OpenDrain::new(db6_pin),
        OpenDrain::new(db7_pin),
    );
    let mut sender = ParallelSender::new(pins);

    let config = Config::default()
        .set_line_mode(LineMode::TwoLine)
        .set_font(Font::Font5x8)
        .set_cursor_state(State::On)
        .set_cursor_blink(State::On);

    // a LCD that never answers is reported instead of hanging the demo
    let poll_policy = PollPolicy::bounded(10_000).with_interval_us(10);

    // init LCD1602
    let mut lcd = match Lcd::new_with_config(&mut sender, &mut delayer, config, poll_policy) {
        Ok(lcd) => lcd,
        Err(e) => {
            rprintln!("LCD init failed: {}", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    if let Err(e) = run(&mut lcd) {
        rprintln!("LCD stopped responding: {}", e);
    }

    #[allow(clippy::empty_loop)]
    loop {}
}

fn run<Sender, Delayer>(
    lcd: &mut Lcd<'_, '_, Sender, Delayer>,
) -> Result<(), hd44780_gpio::Error<Sender::Error>>
where
    Sender: hd44780_gpio::sender::SendCommand<Delayer>,
    Delayer: stm32f4xx_hal::hal::delay::DelayNs,
{
    // put a glyph in CGRAM with raw data writes, then go back to DDRAM
    lcd.set_cgram_address(1 << 3)?;
    HEART.iter().try_for_each(|&row| lcd.send_data(row))?;
    lcd.set_ddram_address(0x00)?;

    lcd.send_string("hello, world!")?;
    lcd.send_data(1)?;

    // read back the first character of the line
    let address = lcd.get_address_counter()?;
    lcd.set_ddram_address(0x00)?;
    let first = lcd.read_data()?;
    rprintln!("address counter {}, first character {}", address, first as char);

    // second line starts at 0x40, write it from right to left
    lcd.entry_mode_set(State::Off, AddressDirection::Decrement)?;
    lcd.set_ddram_address(0x40 + 15)?;
    lcd.send_string(b"!thgir ot tfeL\0")?;
    lcd.entry_mode_set(State::Off, AddressDirection::Increment)?;

    lcd.delay_ms(1_000);

    // shift display window to the left, then bring it back
    (0..4).try_for_each(|_| {
        lcd.delay_ms(250);
        lcd.cursor_or_display_shift(MoveDirection::RightToLeft, ShiftType::CursorAndDisplay)
    })?;
    lcd.return_home()?;

    // and blinking display 3 times
    (0..3).try_for_each(|_| {
        lcd.delay_ms(500);
        lcd.display_on_off(State::Off, State::Off, State::Off)?;
        lcd.delay_ms(500);
        lcd.display_on_off(State::On, State::Off, State::Off)
    })?;

    lcd.delay_ms(2_000);
    lcd.clear_screen()
}
